//! Log output over the ESP32 serial console.

/// Install `esp-println` as the `log` backend
pub fn init_logger(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}

/// Install `esp-println` with the level taken from `ESP_LOG` at build time
pub fn init_logger_from_env() {
    esp_println::logger::init_logger_from_env();
}
