// tfcorpus-core/src/record.rs
//! Instruction/response training records.
//!
//! Each accepted file becomes one [`TrainingRecord`]. The instruction is
//! rendered from a TinyTemplate with three values in scope:
//!
//! * `cloud` - display name of the provider (`aws` -> `AWS`, `google` -> `GCP`, ...)
//! * `service` - the service directory, upper-cased
//! * `topic` - the file name without `.tf`, underscores turned into spaces
//!
//! `provider`, `module`, `file` and `folder` are available as well.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use tinytemplate::TinyTemplate;

use crate::config::RecordsConfig;
use crate::errors::CorpusError;

const TEMPLATE_NAME: &str = "instruction";

/// Separator the scraper uses between the repository folder and the file name.
const FOLDER_SEPARATOR: &str = "__";

/// Folder reported for files scraped from the repository root.
const DEFAULT_FOLDER: &str = "examples";

/// Where a file sits in the `<provider>/<service>/<module>/<file>` tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLocation {
    pub provider: String,
    pub service: String,
    pub module: String,
    pub file_name: String,
}

impl FileLocation {
    pub fn new(
        provider: impl Into<String>,
        service: impl Into<String>,
        module: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            service: service.into(),
            module: module.into(),
            file_name: file_name.into(),
        }
    }

    /// Repository folder encoded in the file name as `<folder>__<file>.tf`.
    pub fn folder(&self) -> &str {
        match self.file_name.split_once(FOLDER_SEPARATOR) {
            Some((folder, _)) => folder,
            None => DEFAULT_FOLDER,
        }
    }

    /// The file name with any folder prefix removed.
    pub fn tf_file(&self) -> &str {
        self.file_name
            .rsplit(FOLDER_SEPARATOR)
            .next()
            .unwrap_or(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub provider: String,
    pub service: String,
    pub module: String,
    pub file: String,
    pub folder: String,
}

/// One fine-tuning sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub instruction: String,
    /// Always empty; kept for compatibility with instruction-tuning formats.
    pub input: String,
    pub output: String,
    pub metadata: RecordMetadata,
}

#[derive(Serialize)]
struct InstructionContext<'a> {
    cloud: String,
    service: String,
    topic: String,
    provider: &'a str,
    module: &'a str,
    file: &'a str,
    folder: &'a str,
}

/// Display name for well-known providers; anything else is upper-cased.
pub fn cloud_label(provider: &str) -> String {
    match provider {
        "aws" => "AWS".to_string(),
        "google" => "GCP".to_string(),
        "azurerm" => "Azure".to_string(),
        "oci" => "Oracle Cloud".to_string(),
        other => other.to_uppercase(),
    }
}

/// Builds training records from accepted files.
///
/// The instruction template is parsed once, when the builder is created, and
/// borrowed from the configuration for the builder's lifetime.
pub struct RecordBuilder<'t> {
    source: &'t str,
    templates: TinyTemplate<'t>,
}

impl fmt::Debug for RecordBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBuilder")
            .field("template", &self.source)
            .finish()
    }
}

impl<'t> RecordBuilder<'t> {
    /// Parses `template` and checks that it renders.
    pub fn new(template: &'t str) -> Result<Self, CorpusError> {
        let mut templates = TinyTemplate::new();
        templates.set_default_formatter(&tinytemplate::format_unescaped);
        templates
            .add_template(TEMPLATE_NAME, template)
            .map_err(|e| CorpusError::Template(e.to_string()))?;

        let builder = Self {
            source: template,
            templates,
        };
        builder.render_instruction(&FileLocation::new("aws", "s3", "module", "main.tf"))?;
        Ok(builder)
    }

    pub fn from_config(config: &'t RecordsConfig) -> Result<Self, CorpusError> {
        Self::new(config.instruction_template())
    }

    pub fn render_instruction(&self, location: &FileLocation) -> Result<String, CorpusError> {
        let context = InstructionContext {
            cloud: cloud_label(&location.provider),
            service: location.service.to_uppercase(),
            topic: location.tf_file().replace(".tf", "").replace('_', " "),
            provider: &location.provider,
            module: &location.module,
            file: &location.file_name,
            folder: location.folder(),
        };

        self.templates
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| CorpusError::Template(e.to_string()))
    }

    pub fn build(&self, location: &FileLocation, content: String) -> Result<TrainingRecord, CorpusError> {
        Ok(TrainingRecord {
            instruction: self.render_instruction(location)?,
            input: String::new(),
            output: content,
            metadata: RecordMetadata {
                provider: location.provider.clone(),
                service: location.service.clone(),
                module: location.module.clone(),
                file: location.file_name.clone(),
                folder: location.folder().to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_INSTRUCTION_TEMPLATE;

    fn default_builder() -> RecordBuilder<'static> {
        RecordBuilder::new(DEFAULT_INSTRUCTION_TEMPLATE).unwrap()
    }

    #[test]
    fn default_instruction_text() {
        let location = FileLocation::new("aws", "ec2", "terraform-aws-ec2", "main.tf");
        let record = default_builder().build(&location, "x".to_string()).unwrap();
        assert_eq!(record.instruction, "Write Terraform code for AWS EC2 (main configuration).");
        assert_eq!(record.input, "");
        assert_eq!(record.output, "x");
        assert_eq!(record.metadata.folder, "examples");
        assert_eq!(record.metadata.file, "main.tf");
    }

    #[test]
    fn folder_prefix_is_split_off() {
        let location = FileLocation::new("google", "gke", "m", "examples_simple__load_balancer.tf");
        assert_eq!(location.folder(), "examples_simple");
        assert_eq!(location.tf_file(), "load_balancer.tf");
        let instruction = default_builder().render_instruction(&location).unwrap();
        assert_eq!(instruction, "Write Terraform code for GCP GKE (load balancer configuration).");
    }

    #[test]
    fn unknown_provider_is_uppercased() {
        assert_eq!(cloud_label("azurerm"), "Azure");
        assert_eq!(cloud_label("oci"), "Oracle Cloud");
        assert_eq!(cloud_label("digitalocean"), "DIGITALOCEAN");
    }

    #[test]
    fn template_output_is_not_html_escaped() {
        let builder = RecordBuilder::new("{cloud} & {service} <{topic}>").unwrap();
        let location = FileLocation::new("aws", "s3", "m", "a_b.tf");
        assert_eq!(builder.render_instruction(&location).unwrap(), "AWS & S3 <a b>");
    }

    #[test]
    fn parsed_template_is_reused_across_records() {
        let config = RecordsConfig {
            instruction_template: Some("{provider}/{module}/{file}".to_string()),
        };
        let builder = RecordBuilder::from_config(&config).unwrap();
        let a = builder.build(&FileLocation::new("aws", "s3", "m1", "a.tf"), String::new()).unwrap();
        let b = builder.build(&FileLocation::new("oci", "vcn", "m2", "b.tf"), String::new()).unwrap();
        assert_eq!(a.instruction, "aws/m1/a.tf");
        assert_eq!(b.instruction, "oci/m2/b.tf");
    }

    #[test]
    fn broken_template_is_rejected_up_front() {
        assert!(matches!(RecordBuilder::new("{unknown_field}"), Err(CorpusError::Template(_))));
    }

    #[test]
    fn record_serializes_with_flat_schema() {
        let location = FileLocation::new("aws", "vpc", "mod", "variables.tf");
        let record = default_builder().build(&location, "body".to_string()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["input"], "");
        assert_eq!(value["output"], "body");
        assert_eq!(value["metadata"]["module"], "mod");
        assert_eq!(value["metadata"]["folder"], "examples");
    }
}
