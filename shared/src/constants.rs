pub const WHEEL_DATA_ENDPOINT: &str = "/api/wheel-data";
pub const SPIN_WHEEL_ENDPOINT: &str = "/api/spin-wheel";
pub const CSRF_TOKEN_ENDPOINT: &str = "/api/csrf-token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

pub const PLACE_ID_STORAGE_KEY: &str = "placeId";
pub const COINS_STORAGE_PREFIX: &str = "coins:";
pub const COINS_UPDATE_EVENT: &str = "coinsUpdate";

pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

// Wheel animation
pub const SPIN_DURATION_MS: f64 = 4000.0;
pub const SPIN_SETTLE_DELAY_MS: u32 = 100;
pub const MIN_EXTRA_TURNS: u32 = 5;
pub const EXTRA_TURN_SPREAD: u32 = 3; // 5, 6 or 7 full turns

// Segment table defaults
pub const DEFAULT_SEGMENT_COUNT: usize = 12;
pub const DEFAULT_SEGMENT_LABEL: &str = "RIPROVA";
pub const WIN_SEGMENT_COLORS: [&str; 1] = ["#ff0054"];
pub const LOSE_SEGMENT_COLORS: [&str; 2] = ["#ffd8e5", "#ffb1ca"];
pub const SEGMENT_TEXT_COLOR: &str = "#131313";

pub const UNEXPECTED_ERROR: &str = "Si è verificato un errore inaspettato. Riprova.";
pub const SPIN_FAILED_ERROR: &str = "Errore durante il giro.";
pub const SPIN_REJECTED_ERROR: &str = "Errore durante il giro della ruota.";
pub const CONNECTION_ERROR: &str = "Errore di connessione durante il giro.";
pub const MISSING_RESULT_ERROR: &str = "Errore nel determinare il risultato.";
pub const SECURITY_ERROR: &str = "Errore di sicurezza. Riprova più tardi.";
pub const MISSING_PLACE_ERROR: &str = "Attività non riconosciuta. Scansiona di nuovo il QR code.";
pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Non hai monete sufficienti per girare la ruota!";
