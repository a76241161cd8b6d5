// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use figment::Figment;
use serde::de::DeserializeOwned;

/// A deserializable section of the application configuration, anchored at
/// a fixed path below the configuration root
pub trait ConfigurationSection: Sized + DeserializeOwned {
    /// Where this section lives relative to the root; `None` means the
    /// section is the root itself
    const PATH: Option<&'static str> = None;

    /// Check the section for values which deserialize fine but make no
    /// sense, like an unparseable cron expression
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    fn validate(
        &self,
        _figment: &Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(())
    }

    /// Load and validate this section out of the given [`Figment`]
    ///
    /// # Errors
    ///
    /// Returns an error if the section could not be deserialized, or if
    /// [`ConfigurationSection::validate`] rejected it
    fn extract(
        figment: &Figment,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let this: Self = match Self::PATH {
            Some(path) => figment.extract_inner(path)?,
            None => figment.extract()?,
        };

        this.validate(figment)?;
        Ok(this)
    }
}
