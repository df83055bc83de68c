use flexi_logger::{Duplicate, Logger};
use log::error;

use irc_server::{Config, Reactor};

fn main() {
    Logger::try_with_str("info")
        .and_then(|logger| {
            logger
                .log_to_stderr()
                .duplicate_to_stderr(Duplicate::All)
                .start()
        })
        .ok();

    let config = match Config::try_from_args(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let mut reactor = match Reactor::new(config) {
        Ok(reactor) => reactor,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    reactor.run();
}
