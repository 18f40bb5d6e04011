//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult};

/// A converter that turns one classic-format file into its compressed sibling.
///
/// `convert` is a single attempt. Retrying is the caller's concern.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Performs one conversion attempt.
    ///
    /// On success the output file exists. The input file is never modified.
    async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
            Ok(ConversionResult {
                output_path: job.output_path.clone(),
                output_size_bytes: 0,
                duration_ms: 0,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_converter_is_object_safe() {
        let converter: Box<dyn Converter> = Box::new(EchoConverter);
        let job = ConversionJob {
            input_path: PathBuf::from("a.nc"),
            output_path: PathBuf::from("a_new.nc"),
            compression_level: 1,
        };
        let result = converter.convert(&job).await.unwrap();
        assert_eq!(result.output_path, PathBuf::from("a_new.nc"));
        assert_eq!(converter.name(), "echo");
    }
}
