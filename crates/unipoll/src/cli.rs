// CLI argument definitions.

use clap::Parser;

/// UniFi controller telemetry bridge.
#[derive(Debug, Parser)]
#[command(name = "unipoll", version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Poller config file path. Separate multiple paths with commas to
    /// load the first file found.
    #[arg(short, long, env = "UP_CONFIG_FILE")]
    pub config: Option<String>,

    /// Print the version and exit.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Print a JSON payload and exit: devices, clients, or "other <path>".
    /// Append :N to select a controller index.
    #[arg(short = 'j', long)]
    pub dumpjson: Option<String>,

    /// Bcrypt a provided string, useful for the web server password.
    /// Use - to read the password from stdin.
    #[arg(short, long)]
    pub encrypt: Option<String>,

    /// Check every configured input and output, then exit.
    #[arg(short, long)]
    pub debugio: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dump_and_config_flags() {
        let cli = Cli::parse_from(["unipoll", "-c", "/etc/up.conf,/tmp/up.conf", "-j", "devices:1"]);
        assert_eq!(cli.config.as_deref(), Some("/etc/up.conf,/tmp/up.conf"));
        assert_eq!(cli.dumpjson.as_deref(), Some("devices:1"));
        assert!(!cli.debugio);
    }

    #[test]
    fn parses_encrypt_flag() {
        let cli = Cli::parse_from(["unipoll", "--encrypt", "-"]);
        assert_eq!(cli.encrypt.as_deref(), Some("-"));
    }
}
