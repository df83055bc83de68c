use clap::Parser;

use crate::error::SetupError;

/// `<prog> <port> <password>`. Positional, no flags, no environment
/// variables, no config file: the whole surface is two arguments
/// validated by [`Config::try_from_args`].
#[derive(Debug, Parser)]
#[command(name = "irc_server", about = "A minimal, classroom-grade IRC daemon")]
struct Cli {
    /// TCP port to listen on, 1-65535.
    port: String,

    /// Shared server password required by PASS.
    password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub password: String,
    pub server_name: String,
}

impl Config {
    /// Parses `argv` (excluding the program name) into a validated
    /// [`Config`], or a [`SetupError`] describing the first problem found.
    pub fn try_from_args<I, T>(args: I) -> Result<Config, SetupError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        // clap handles arity and --help/--version; we do the range/non-empty
        // validation ourselves so a bad port or password exits 1, not
        // clap's usual exit code 2.
        let cli = Cli::try_parse_from(args).map_err(|e| {
            e.print().ok();
            SetupError::InvalidPort(String::new())
        })?;

        let port: u16 = cli
            .port
            .parse()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| SetupError::InvalidPort(cli.port.clone()))?;

        if cli.password.is_empty() {
            return Err(SetupError::EmptyPassword);
        }

        Ok(Config {
            port,
            password: cli.password,
            server_name: "ft_irc.min".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_port_and_password() {
        let cfg = Config::try_from_args(["irc_server", "6667", "pw"]).unwrap();
        assert_eq!(cfg.port, 6667);
        assert_eq!(cfg.password, "pw");
        assert_eq!(cfg.server_name, "ft_irc.min");
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Config::try_from_args(["irc_server", "70000", "pw"]).is_err());
        assert!(Config::try_from_args(["irc_server", "0", "pw"]).is_err());
        assert!(Config::try_from_args(["irc_server", "notaport", "pw"]).is_err());
    }

    #[test]
    fn rejects_empty_password() {
        assert!(Config::try_from_args(["irc_server", "6667", ""]).is_err());
    }
}
