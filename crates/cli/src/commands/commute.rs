use aptscout_commute::CommuteClient;
use aptscout_core::TravelMode;

use crate::commands::{load_config, CommandResult};

pub const EXIT_COMMUTE_FAILED: u8 = 4;

pub fn run(origins: Vec<String>, destination: &str, mode: TravelMode) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("commute", &error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "commute",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_COMMUTE_FAILED,
            );
        }
    };

    let client = CommuteClient::from_config(&config.maps);
    let outcome = runtime.block_on(client.check_commutes(origins, destination, mode));

    let exit_code = if outcome.is_failure() { EXIT_COMMUTE_FAILED } else { 0 };
    CommandResult::raw(exit_code, outcome.payload())
}
