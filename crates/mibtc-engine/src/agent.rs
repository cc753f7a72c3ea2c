//! Startup wiring
//!
//! Builds the type registry, generates the object space, registers it with
//! the protocol engine and hands the result to a write engine.

use mibtc_core::catalog::{parse_behaviour, parse_type_records, GenerationFailure};
use mibtc_core::errors::MibError;
use mibtc_core::{
    build_object_space, log_op_end, log_op_error, log_op_start, AgentConfig, DefaultSynthesizer,
    ObjectRecord, ObjectSpace, TypeNode, TypeRegistry, TypeRegistryBuilder,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::engine::ProtocolEngine;
use crate::errors::Result;
use crate::registration::{Registrar, RegistrationReport};
use crate::sink::ChangeSink;
use crate::write::{WriteEngine, WriteOptions};

pub struct Agent {
    registry: TypeRegistry,
    generation_failures: Vec<GenerationFailure>,
    registration: RegistrationReport,
    writer: WriteEngine,
}

impl Agent {
    /// Resolve `types`, generate objects from `records` and register them
    ///
    /// Unresolvable types, ungeneratable objects and unregistrable objects
    /// are reported, not fatal.
    ///
    /// # Errors
    ///
    /// `DuplicateType` if `types` redefines a name, `Config` if the
    /// configuration names an unknown default provider.
    pub fn bootstrap(
        config: &AgentConfig,
        types: Vec<TypeNode>,
        records: &[ObjectRecord],
        engine: Arc<dyn ProtocolEngine>,
        sink: Arc<dyn ChangeSink>,
    ) -> Result<Self> {
        log_op_start!("agent_bootstrap", types = types.len(), records = records.len());
        let start = Instant::now();
        let fail = |e: MibError| {
            log_op_error!(
                "agent_bootstrap",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        };

        let mut builder = TypeRegistryBuilder::standard();
        builder.extend(types).map_err(fail)?;
        let registry = builder.build();
        let synth = DefaultSynthesizer::from_config(&config.defaults).map_err(fail)?;

        let report = build_object_space(records, &registry, &synth);
        let space = Arc::new(report.space);
        let (registration, store) = Registrar::new(engine.as_ref())
            .with_seed_rows(config.registration.seed_rows)
            .register_object_space(&space);
        let writer = WriteEngine::new(
            space,
            store,
            engine,
            sink,
            WriteOptions::from(&config.write),
        );

        log_op_end!(
            "agent_bootstrap",
            duration_ms = start.elapsed().as_millis() as u64,
            type_failures = registry.failures().len(),
            generation_failures = report.failures.len(),
            skipped = registration.skipped.len()
        );
        Ok(Self {
            registry,
            generation_failures: report.failures,
            registration,
            writer,
        })
    }

    /// Bootstrap from a YAML config plus JSON type and behaviour records
    ///
    /// # Errors
    ///
    /// `Io`, `Config` or `Serialization` if a file cannot be read or parsed,
    /// then anything [`Agent::bootstrap`] reports.
    pub fn from_files(
        config_path: &Path,
        types_path: &Path,
        behaviour_path: &Path,
        engine: Arc<dyn ProtocolEngine>,
        sink: Arc<dyn ChangeSink>,
    ) -> Result<Self> {
        let config = AgentConfig::load(config_path)?;
        let types = parse_type_records(&read_records(types_path)?)?;
        let records = parse_behaviour(&read_records(behaviour_path)?)?;
        Self::bootstrap(&config, types, &records, engine, sink)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn generation_failures(&self) -> &[GenerationFailure] {
        &self.generation_failures
    }

    pub fn registration(&self) -> &RegistrationReport {
        &self.registration
    }

    pub fn writer(&self) -> &WriteEngine {
        &self.writer
    }

    pub fn space(&self) -> &ObjectSpace {
        self.writer.space()
    }
}

fn read_records(path: &Path) -> std::result::Result<String, MibError> {
    std::fs::read_to_string(path).map_err(|e| MibError::Io {
        message: format!("Failed to read records {}: {}", path.display(), e),
    })
}
