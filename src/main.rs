#![no_std]
#![no_main]

extern crate rlibc;

use bootloader_api::config::BootloaderConfig;
use bootloader_api::{entry_point, BootInfo};
use core::panic::PanicInfo;
use log::{error, info, warn};

use monk_kernel::config::KERNEL_STACK_SIZE;
use monk_kernel::console::ConsoleMux;
use monk_kernel::devices::framebuffer::framebuffer::FramebufferWriter;
use monk_kernel::interrupts::{self, gdt};
use monk_kernel::kernel::{self, X86Platform};
use monk_kernel::{logger, println};

pub static BOOTLOADER_CONFIG: BootloaderConfig = {
    let mut config = BootloaderConfig::new_default();
    config.kernel_stack_size = KERNEL_STACK_SIZE;
    config
};

entry_point!(kernel_main, config = &BOOTLOADER_CONFIG);

fn kernel_main(boot_info: &'static mut BootInfo) -> ! {
    if let Err(e) = logger::init() {
        println!("logger: {}", e);
    }
    gdt::init();

    let mut consoles = match boot_info.framebuffer.as_mut() {
        Some(fb) => {
            let writer = FramebufferWriter::new(fb);
            info!(
                "framebuffer {}x{} ({} bytes/pixel)",
                writer.width, writer.height, writer.bytes_per_pixel
            );
            ConsoleMux::with_display(writer)
        }
        None => {
            warn!("no framebuffer, console output is buffered only");
            ConsoleMux::new()
        }
    };

    let mut platform = X86Platform;
    let status = match kernel::boot(&mut platform, &mut consoles) {
        Ok(status) => status,
        Err(e) => {
            error!("boot aborted: {}", e);
            park();
        }
    };
    for component in status.iter() {
        info!("  {:<16} {}", component.name, component.status);
    }
    if !status.all_ready() {
        warn!("boot finished with components not ready");
    }

    let mut keys = X86Platform;
    kernel::run(&mut platform, &mut keys, &mut consoles)
}

fn park() -> ! {
    loop {
        interrupts::halt();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    x86_64::instructions::interrupts::disable();
    println!("PANIC : {} | {:?}", info.message(), info.location());
    park()
}
