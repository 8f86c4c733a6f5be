#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub log_filter: String,

    // Time zone reported for profiles that never chose one.
    pub default_time_zone: String,

    // Optional superuser bootstrap. All four must be set for it to run.
    pub superuser_username: Option<String>,
    pub superuser_email: Option<String>,
    pub superuser_phone: Option<String>,
    pub superuser_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3333,
            database_url: None,
            log_filter: "info".to_string(),
            default_time_zone: "UTC".to_string(),
            superuser_username: None,
            superuser_email: None,
            superuser_phone: None,
            superuser_password: None,
        }
    }
}
