//! Dictionary filling
//!
//! A fill walks the mapping once. Each key is looked up in the target's
//! descriptor, the value is coerced to the declared type, and the result is
//! assigned. Every key that cannot be applied is recorded as a
//! [`SkipReason`] and the walk continues. Keys the mapping lacks leave their
//! fields untouched.

use crate::coerce::{Coercer, Coercion};
use crate::config::MapperConfig;
use crate::error::{MapperResult, SkipReason};
use crate::registry::{TypeDescriptor, TypeRegistry};
use kvmap_types::{DateFormat, DateParser, Reflect, Value, ValueMapping};
use std::sync::Arc;
use tracing::debug;

/// What a fill did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    /// Fields assigned, in mapping order. A key assigned twice appears twice.
    pub applied: Vec<String>,
    /// Keys left unapplied, in mapping order
    pub skipped: Vec<SkipReason>,
}

impl FillReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn was_applied(&self, field: &str) -> bool {
        self.applied.iter().any(|name| name == field)
    }

    pub fn skip_for(&self, field: &str) -> Option<&SkipReason> {
        self.skipped.iter().find(|reason| reason.field() == field)
    }
}

/// Fills objects from string-keyed mappings.
///
/// Cheap to clone; clones share the descriptor cache.
#[derive(Debug, Clone)]
pub struct Mapper {
    registry: Arc<TypeRegistry>,
    coercer: Coercer,
    record_skips: bool,
}

impl Mapper {
    /// Mapper over the process-wide registry with ISO-8601 dates
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            coercer: Coercer::default(),
            record_skips: true,
        }
    }

    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new()
            .with_date_format(config.date_format.clone())
            .with_record_skips(config.record_skips)
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.coercer = Coercer::new(date_format);
        self
    }

    /// Replace the date parser, keeping the current format
    pub fn with_date_parser(mut self, parser: Arc<dyn DateParser>) -> Self {
        let format = self.coercer.date_format().clone();
        self.coercer = Coercer::with_parser(parser, format);
        self
    }

    pub fn with_record_skips(mut self, record_skips: bool) -> Self {
        self.record_skips = record_skips;
        self
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn date_format(&self) -> &DateFormat {
        self.coercer.date_format()
    }

    /// Fill `target` from `mapping`.
    ///
    /// Fails only when the target exposes no schema.
    pub fn fill<T: Reflect + ?Sized>(
        &self,
        target: &mut T,
        mapping: &ValueMapping,
    ) -> MapperResult<FillReport> {
        self.fill_entries(target, mapping.iter())
    }

    /// Fill from arbitrary pairs. Repeated keys are applied in order, so the
    /// last applicable value wins.
    pub fn fill_entries<'a, T, I>(&self, target: &mut T, entries: I) -> MapperResult<FillReport>
    where
        T: Reflect + ?Sized,
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let descriptor = self.registry.describe(&*target)?;
        let mut report = FillReport::default();

        for (key, value) in entries {
            match self.apply(&descriptor, target, key, value) {
                Ok(()) => report.applied.push(key.to_string()),
                Err(reason) => {
                    debug!(
                        type_name = descriptor.name(),
                        field = key,
                        reason = %reason,
                        "Skipped field"
                    );
                    if self.record_skips {
                        report.skipped.push(reason);
                    }
                }
            }
        }

        debug!(
            type_name = descriptor.name(),
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Fill complete"
        );
        Ok(report)
    }

    /// Fill from a decoded JSON object
    pub fn fill_json<T: Reflect + ?Sized>(
        &self,
        target: &mut T,
        json: &serde_json::Value,
    ) -> MapperResult<FillReport> {
        let mapping = ValueMapping::from_json(json)?;
        self.fill(target, &mapping)
    }

    /// By-value form of [`Mapper::fill`]
    pub fn filled<T: Reflect>(
        &self,
        mut target: T,
        mapping: &ValueMapping,
    ) -> MapperResult<(T, FillReport)> {
        let report = self.fill(&mut target, mapping)?;
        Ok((target, report))
    }

    /// Build a default instance and fill it
    pub fn from_mapping<T: Reflect + Default>(&self, mapping: &ValueMapping) -> MapperResult<T> {
        let (target, _) = self.filled(T::default(), mapping)?;
        Ok(target)
    }

    fn apply<T: Reflect + ?Sized>(
        &self,
        descriptor: &TypeDescriptor,
        target: &mut T,
        key: &str,
        value: &Value,
    ) -> Result<(), SkipReason> {
        let declared = descriptor
            .field_type(key)
            .ok_or_else(|| SkipReason::UnknownField {
                field: key.to_string(),
            })?;

        match self.coercer.coerce(key, declared, value) {
            Coercion::Applicable(coerced) => {
                target
                    .set(key, coerced)
                    .map_err(|source| SkipReason::AccessorRejection {
                        field: key.to_string(),
                        source,
                    })
            }
            Coercion::NotApplicable(reason) => Err(reason),
        }
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `target` with the global registry and the given date format
pub fn fill<T: Reflect + ?Sized>(
    target: &mut T,
    mapping: &ValueMapping,
    date_format: &DateFormat,
) -> MapperResult<FillReport> {
    Mapper::new()
        .with_date_format(date_format.clone())
        .fill(target, mapping)
}
