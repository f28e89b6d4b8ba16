use std::fmt;

/// Short and long forms of the port-channel name both start with this.
const AGGREGATION_PREFIX: &str = "Po";

/// An interface name exactly as the switch printed it (`Gi1/0/1`, `Po1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceRef {
    name: String,
}

impl InterfaceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port-channels never originate CDP themselves, so the search has to
    /// probe one of their member links instead.
    pub fn is_aggregation(&self) -> bool {
        self.name.starts_with(AGGREGATION_PREFIX)
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
