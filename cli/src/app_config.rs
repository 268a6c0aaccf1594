use std::path::Path;

use anyhow::{bail, Context};
use serde::{Serialize, Serializer};
use simplenote_core::{
    ClientConfig, Credentials, Endpoints, LegacyClient, NoteSource, SimperiumClient,
};

use crate::{
    args::{ConfigArgs, CredentialArgs, Dialect},
    profile::Profile,
};

pub const DEFAULT_NOTES_FILENAME: &str = simplenote_core::incremental::DEFAULT_NOTES_FILE;
pub const DEFAULT_LOG_FILENAME: &str = "log.txt";

/// Settings after merging arguments, environment and profile.
#[derive(Debug, Serialize)]
pub struct AppConfig {
    pub profile_path: String,
    pub profile_exists: bool,
    pub dialect: Dialect,
    pub username: Option<String>,
    #[serde(serialize_with = "masked")]
    pub password: Option<String>,
    #[serde(serialize_with = "masked")]
    pub api_key: Option<String>,
    pub notes_path: String,
    pub log_path: String,
    pub endpoints: Endpoints,
    pub verbose: bool,
}

fn masked<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_str("***"),
        None => serializer.serialize_none(),
    }
}

fn pick(profile: Option<&Profile>, field: fn(&Profile) -> &Option<String>) -> Option<String> {
    profile.and_then(|p| field(p).clone())
}

impl AppConfig {
    /// Command line (and its env fallbacks) wins over the profile, the profile
    /// wins over built-in defaults.
    pub fn from_args(
        args: ConfigArgs,
        credentials: CredentialArgs,
        profile_path: &Path,
        profile: Option<&Profile>,
    ) -> Self {
        let mut endpoints = Endpoints::default();
        if let Some(url) = args.api_url.or_else(|| pick(profile, |p| &p.api_url)) {
            endpoints.api_root = url;
        }
        if let Some(url) = args.auth_url.or_else(|| pick(profile, |p| &p.auth_url)) {
            endpoints.auth_root = url;
        }
        if let Some(url) = args.legacy_url.or_else(|| pick(profile, |p| &p.legacy_url)) {
            endpoints.legacy_root = url;
        }

        AppConfig {
            profile_path: profile_path.to_string_lossy().into_owned(),
            profile_exists: profile.is_some(),
            dialect: args
                .dialect
                .or_else(|| profile.and_then(|p| p.dialect))
                .unwrap_or_default(),
            username: credentials.user.or_else(|| pick(profile, |p| &p.username)),
            password: credentials.password,
            api_key: credentials.api_key.or_else(|| pick(profile, |p| &p.api_key)),
            notes_path: args
                .notes_file
                .or_else(|| pick(profile, |p| &p.notes_path))
                .unwrap_or_else(|| DEFAULT_NOTES_FILENAME.to_string()),
            log_path: args
                .log_file
                .or_else(|| pick(profile, |p| &p.log_path))
                .unwrap_or_else(|| DEFAULT_LOG_FILENAME.to_string()),
            endpoints,
            verbose: args.verbose,
        }
    }

    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        let Some(user) = &self.username else {
            bail!("No username given (argument, SIMPLENOTE_USER or `username` in the profile)");
        };
        let Some(password) = &self.password else {
            bail!("No password given (argument or SIMPLENOTE_PASSWORD)");
        };

        let credentials = Credentials::new(user, password);
        match (&self.api_key, self.dialect) {
            (Some(key), _) => Ok(credentials.with_api_key(key)),
            (None, Dialect::Legacy) => Ok(credentials),
            (None, Dialect::Simperium) => bail!(
                "No API key given (argument, SIMPLENOTE_API_KEY or `api_key` in the profile)"
            ),
        }
    }

    /// Client for the configured dialect. Nothing is sent until the first call.
    pub fn client(&self) -> anyhow::Result<Box<dyn NoteSource>> {
        let credentials = self.credentials()?;
        let config = ClientConfig::default().with_endpoints(self.endpoints.clone());

        let client: Box<dyn NoteSource> = match self.dialect {
            Dialect::Simperium => Box::new(
                SimperiumClient::with_config(credentials, config)
                    .context("Failed to create the Simperium client")?,
            ),
            Dialect::Legacy => Box::new(
                LegacyClient::with_config(credentials, config)
                    .context("Failed to create the legacy client")?,
            ),
        };
        Ok(client)
    }
}
