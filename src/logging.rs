//! ESP32 log backend

/// Route `log` records to the ESP32 console
pub fn init(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
