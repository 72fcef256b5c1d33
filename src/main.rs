#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println::logger::init_logger;

use mqtt_rc_switch_bridge::config::{Config, SETTINGS};
use mqtt_rc_switch_bridge::constants::{HEARTBEAT_INTERVAL_SECS, SUBSCRIPTION_DATA_LEN, VERSION};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    // Info until the configuration says whether debug output is wanted
    init_logger(log::LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    log::info!("RC switch bridge firmware v{}", VERSION);

    let config = match Config::load(&SETTINGS, SUBSCRIPTION_DATA_LEN) {
        Ok(config) => config,
        Err(violations) => {
            for err in &violations {
                log::error!("Invalid configuration: {}", err);
            }
            // No partial configuration mode, halt here
            panic!(
                "{} configuration error(s), refusing to start",
                violations.len()
            );
        }
    };

    log::set_max_level(config.log_level());
    config.log_summary();

    loop {
        Timer::after(Duration::from_secs(HEARTBEAT_INTERVAL_SECS)).await;
        log::debug!("Heartbeat, uptime {}s", embassy_time::Instant::now().as_secs());
    }
}
