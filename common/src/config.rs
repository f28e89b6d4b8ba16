use std::time::Duration;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_MAX_HOPS: usize = 32;

pub struct Config {
    /// TCP port of the device SSH servers.
    pub port: u16,

    /// Upper bound for a single command to return to the prompt.
    pub command_timeout: Duration,

    /// Upper bound for connecting and authenticating to a device.
    pub connect_timeout: Duration,

    /// How long the terminal stays open after the result is printed.
    ///
    /// The tool is often the only thing a restricted login runs, so the
    /// session would close before anyone could read the answer.
    pub hold: Duration,

    /// Stops the walk after this many devices, which breaks CDP cycles.
    pub max_hops: usize,

    /// 0 prints everything, 1 hides headers, 2 only prints the result.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            command_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            hold: Duration::from_secs(30),
            max_hops: DEFAULT_MAX_HOPS,
            quiet: 0,
        }
    }
}
