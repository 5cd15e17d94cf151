use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places kept for money amounts
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Largest money amount accepted for saving goals and calculations
pub const MAX_MONEY_AMOUNT: Decimal = dec!(1000000000000000);

/// Longest horizon the savings calculator simulates (100 years)
pub const MAX_PROJECTION_MONTHS: u32 = 1200;

/// Configuration key holding the instance display name
pub const CONFIG_INSTANCE_NAME: &str = "instance-name";

/// Configuration key holding the default UI locale
pub const CONFIG_DEFAULT_LOCALE: &str = "default-locale";

/// Configuration key holding the RFC3339 creation timestamp of the instance
pub const CONFIG_INSTANCE_CREATED_AT: &str = "instance-created-at";

/// Instance name used until setup stores one
pub const DEFAULT_INSTANCE_NAME: &str = "HomeBook";

/// Locale used until setup stores one
pub const DEFAULT_LOCALE: &str = "en-US";

/// Locales the platform ships translations for
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "de-DE", "fr-FR", "es-ES"];

/// Identifier written into `users.password_hash_type`
pub const PASSWORD_HASH_TYPE_ARGON2ID: &str = "argon2id";
