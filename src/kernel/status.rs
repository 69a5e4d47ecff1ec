use core::fmt;

/// Kernel initialization status tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    NotStarted,
    InProgress,
    Completed,
    Failed(&'static str),
}

/// Kernel component status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStatus {
    pub name: &'static str,
    pub status: InitStatus,
}

impl ComponentStatus {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            status: InitStatus::NotStarted,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, InitStatus::Completed)
    }
}

pub const MAX_COMPONENTS: usize = 8;

/// Fixed-capacity table of boot components, in registration order.
#[derive(Debug, Clone)]
pub struct StatusTable {
    components: [Option<ComponentStatus>; MAX_COMPONENTS],
}

impl StatusTable {
    pub const fn new() -> Self {
        Self {
            components: [None; MAX_COMPONENTS],
        }
    }

    /// Track kernel component initialization. Re-registering a name is a
    /// no-op; registering past capacity is refused.
    pub fn register(&mut self, name: &'static str) -> Result<(), &'static str> {
        if self.get(name).is_some() {
            return Ok(());
        }
        let slot = self
            .components
            .iter_mut()
            .find(|c| c.is_none())
            .ok_or("component status table full")?;
        *slot = Some(ComponentStatus::new(name));
        Ok(())
    }

    /// Update component status
    pub fn update(&mut self, name: &'static str, status: InitStatus) {
        if let Some(comp) = self.components.iter_mut().flatten().find(|c| c.name == name) {
            comp.status = status;
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentStatus> {
        self.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentStatus> {
        self.components.iter().flatten()
    }

    /// Check if all components are initialized
    pub fn all_ready(&self) -> bool {
        let mut components = self.iter().peekable();
        components.peek().is_some() && components.all(|c| c.is_complete())
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStatus::NotStarted => write!(f, "Not Started"),
            InitStatus::InProgress => write!(f, "In Progress"),
            InitStatus::Completed => write!(f, "Completed"),
            InitStatus::Failed(err) => write!(f, "Failed: {}", err),
        }
    }
}
