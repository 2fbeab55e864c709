use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Single shared admin credential. Login answers 500 while either is unset.
    #[serde(default)]
    pub admin_user: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    /// Fallback master password used when no `master_password` setting is stored.
    #[serde(default)]
    pub page_access_password: Option<String>,

    #[serde(default)]
    pub email_user: Option<String>,

    #[serde(default)]
    pub email_pass: Option<String>,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub contact_recipient: Option<String>,

    #[serde(default = "default_content_dir")]
    pub content_dir: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Gate".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}
fn default_content_dir() -> String {
    "content/projects".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;

        // Legacy unprefixed names are still honoured for the optional secrets
        fill_opt_from_env(&mut config.admin_user, "ADMIN_USER");
        fill_opt_from_env(&mut config.admin_password, "ADMIN_PASSWORD");
        fill_opt_from_env(&mut config.page_access_password, "PAGE_ACCESS_PASSWORD");
        fill_opt_from_env(&mut config.email_user, "EMAIL_USER");
        fill_opt_from_env(&mut config.email_pass, "EMAIL_PASS");

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    /// Optional secrets that are absent. Logged by the caller once tracing is up.
    pub fn missing_secret_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.admin_credentials().is_none() {
            warnings.push("Admin credentials are not configured; admin login will fail");
        }
        if self.fallback_master_password().is_none() {
            warnings.push("No fallback page password; only a stored master_password opens gated pages");
        }
        if self.mail_credentials().is_none() {
            warnings.push("Email credentials are not configured; the contact form will fail");
        }
        warnings
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        AdminCredentials::try_from(self).ok()
    }

    pub fn fallback_master_password(&self) -> Option<Zeroizing<String>> {
        non_empty(&self.page_access_password).map(|p| Zeroizing::new(p.to_string()))
    }

    pub fn mail_credentials(&self) -> Option<MailCredentials> {
        MailCredentials::try_from(self).ok()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

fn fill_opt_from_env(current: &mut Option<String>, env_key: &str) {
    if non_empty(current).is_none() {
        *current = env::var(env_key).ok().filter(|v| !v.is_empty());
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        self.as_deref().unwrap_or_default().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("admin_user", &self.admin_user.redact())
            .field("admin_password", &self.admin_password.redact())
            .field("page_access_password", &self.page_access_password.redact())
            .field("email_user", &self.email_user)
            .field("email_pass", &self.email_pass.redact())
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("contact_recipient", &self.contact_recipient)
            .field("content_dir", &self.content_dir)
            .finish()
    }
}

/// The environment-configured admin login pair.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: Zeroizing<String>,
    pub password: Zeroizing<String>,
}

impl TryFrom<&AppConfig> for AdminCredentials {
    type Error = ConfigError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        match (non_empty(&config.admin_user), non_empty(&config.admin_password)) {
            (Some(user), Some(pass)) => Ok(AdminCredentials {
                username: Zeroizing::new(user.to_string()),
                password: Zeroizing::new(pass.to_string()),
            }),
            _ => Err(ConfigError::Message("Admin credentials are not configured".into())),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// SMTP login plus the addresses the contact relay needs.
#[derive(Clone)]
pub struct MailCredentials {
    pub user: String,
    pub pass: Zeroizing<String>,
    pub host: String,
    pub port: u16,
    pub recipient: String,
}

impl TryFrom<&AppConfig> for MailCredentials {
    type Error = ConfigError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        match (non_empty(&config.email_user), non_empty(&config.email_pass)) {
            (Some(user), Some(pass)) => Ok(MailCredentials {
                user: user.to_string(),
                pass: Zeroizing::new(pass.to_string()),
                host: config.smtp_host.clone(),
                port: config.smtp_port,
                recipient: non_empty(&config.contact_recipient).unwrap_or(user).to_string(),
            }),
            _ => Err(ConfigError::Message("Email credentials are not configured".into())),
        }
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("recipient", &self.recipient)
            .finish()
    }
}
