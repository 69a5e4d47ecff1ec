//! Kernel initialization phases

use core::fmt;

use log::{error, info};

use crate::config::{MAX_CONSOLES, TIMER_HZ};
use crate::console::{Consoles, TextColor};
use crate::kernel::platform::Platform;
use crate::kernel::status::{InitStatus, StatusTable};

/// Printed once on every virtual console after interrupts are live.
pub const WELCOME_BANNER: &str = "Welcome to \x1b[e]MonkOS\x1b[-] (v0.1).\n";

const PHASES: [&str; 5] = ["Console", "System Calls", "Interrupt Tables", "Keyboard", "Timer"];

/// A boot phase that did not come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootError {
    pub phase: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.phase, self.reason)
    }
}

/// Brings the machine from entry to "ready to service interrupts".
///
/// Order matters: the syscall MSRs and interrupt tables have to exist before
/// any device can raise an interrupt, and interrupts stay off until every
/// handler's state is set up. On success every console shows the welcome
/// banner, console 0 is active and the returned table has all phases
/// `Completed`.
pub fn boot<P, C>(platform: &mut P, consoles: &mut C) -> Result<StatusTable, BootError>
where
    P: Platform,
    C: Consoles,
{
    let mut status = StatusTable::new();
    for name in PHASES {
        status
            .register(name)
            .map_err(|reason| BootError { phase: name, reason })?;
    }

    init_phase(&mut status, 1, PHASES[0], &mut || {
        consoles.init();
        consoles.set_text_color(0, TextColor::White, TextColor::Black);
        consoles.clear(0);
        Ok(())
    })?;
    init_phase(&mut status, 2, PHASES[1], &mut || platform.syscall_init())?;
    init_phase(&mut status, 3, PHASES[2], &mut || platform.interrupts_init())?;
    init_phase(&mut status, 4, PHASES[3], &mut || platform.keyboard_init())?;
    init_phase(&mut status, 5, PHASES[4], &mut || platform.timer_init(TIMER_HZ))?;

    platform.interrupts_enable();
    info!("interrupts enabled, timer at {} Hz", TIMER_HZ);

    for id in 0..MAX_CONSOLES {
        consoles.print(id, WELCOME_BANNER);
        consoles.set_text_color_fg(id, TextColor::LightGray);
    }

    info!("kernel initialization complete");
    Ok(status)
}

fn init_phase(
    status: &mut StatusTable,
    step: usize,
    name: &'static str,
    init_fn: &mut dyn FnMut() -> Result<(), &'static str>,
) -> Result<(), BootError> {
    status.update(name, InitStatus::InProgress);
    info!("[{}/{}] Initializing {}...", step, PHASES.len(), name);

    match init_fn() {
        Ok(()) => {
            status.update(name, InitStatus::Completed);
            info!("    {} initialized", name);
            Ok(())
        }
        Err(reason) => {
            status.update(name, InitStatus::Failed(reason));
            error!("    {} failed: {}", name, reason);
            Err(BootError { phase: name, reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::testing::{MockPlatform, RecordingConsoles};

    #[test]
    fn hardware_is_brought_up_in_order() {
        let mut platform = MockPlatform::new();
        let mut consoles = RecordingConsoles::new();
        let status = boot(&mut platform, &mut consoles).unwrap();

        assert_eq!(
            platform.calls,
            ["syscall_init", "interrupts_init", "keyboard_init", "timer_init(20)", "interrupts_enable"]
        );
        assert!(status.all_ready());
    }

    #[test]
    fn console_zero_is_reset_before_anything_else() {
        let mut platform = MockPlatform::new();
        let mut consoles = RecordingConsoles::new();
        boot(&mut platform, &mut consoles).unwrap();

        assert_eq!(
            &consoles.calls[..3],
            ["init", "set_text_color(0, White, Black)", "clear(0)"]
        );
    }

    #[test]
    fn every_console_gets_a_banner_after_interrupts_are_enabled() {
        let mut platform = MockPlatform::new();
        let mut consoles = RecordingConsoles::new();
        boot(&mut platform, &mut consoles).unwrap();

        let banners: std::vec::Vec<_> = consoles
            .printed
            .iter()
            .filter(|(_, text)| text == WELCOME_BANNER)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(banners, (0..MAX_CONSOLES).collect::<std::vec::Vec<_>>());
        assert_eq!(consoles.active(), 0);

        let fg_calls = consoles
            .calls
            .iter()
            .filter(|c| c.starts_with("set_text_color_fg("))
            .count();
        assert_eq!(fg_calls, MAX_CONSOLES);
        assert_eq!(
            consoles.calls.last().map(std::string::String::as_str),
            Some("set_text_color_fg(3, LightGray)")
        );
    }

    #[test]
    fn failing_phase_stops_the_sequence() {
        let mut platform = MockPlatform::failing_at("keyboard_init", "no i8042");
        let mut consoles = RecordingConsoles::new();
        let err = boot(&mut platform, &mut consoles).unwrap_err();

        assert_eq!(err, BootError { phase: "Keyboard", reason: "no i8042" });
        assert_eq!(std::format!("{}", err), "Keyboard failed: no i8042");
        assert!(!platform.calls.iter().any(|c| c == "interrupts_enable"));
        assert!(consoles.printed.is_empty());
    }

    #[test]
    fn banner_highlight_lands_in_console_cells() {
        use crate::console::ConsoleMux;
        use crate::kernel::testing::NullDisplay;

        let mut platform = MockPlatform::new();
        let mut consoles: ConsoleMux<NullDisplay> = ConsoleMux::new();
        boot(&mut platform, &mut consoles).unwrap();
        assert_eq!(consoles.active(), 0);

        for id in 0..MAX_CONSOLES {
            let console = consoles.console(id).unwrap();
            let row = console.row_bytes(0);
            assert_eq!(
                std::string::String::from_utf8_lossy(&row).trim_end(),
                "Welcome to MonkOS (v0.1)."
            );
            // "Welcome to " is 11 cells, "MonkOS" the next 6.
            let base = if id == 0 { TextColor::White } else { TextColor::LightGray };
            assert_eq!(console.cell(0, 0).unwrap().fg, base);
            for x in 11..17 {
                assert_eq!(console.cell(x, 0).unwrap().fg, TextColor::Yellow);
            }
            assert_eq!(console.cell(17, 0).unwrap().fg, base);
        }

        consoles.print(0, "x");
        assert_eq!(consoles.console(0).unwrap().cell(0, 1).unwrap().fg, TextColor::LightGray);
    }
}
