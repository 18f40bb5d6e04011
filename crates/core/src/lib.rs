pub mod config;
pub mod converter;
pub mod notify;
pub mod placer;
pub mod processor;
pub mod report;
pub mod testing;
pub mod verifier;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, NotifyBackend,
    NotifyConfig, PushoverConfig,
};
pub use converter::{
    locate_executable, ConversionJob, ConversionResult, Converter, ConverterConfig,
    ConverterError, NcksConverter,
};
pub use notify::{create_notifier, NoopNotifier, Notifier, NotifyError, PushoverNotifier};
pub use placer::{FsReplacer, PlacerError, Replacer};
pub use processor::{
    discover_files, BatchProcessor, ConversionOutcome, FileStatus, FileTask, ProcessorConfig,
    ProcessorError, RetryConfig,
};
pub use report::RunSummary;
pub use verifier::{DatasetReader, NcksJsonReader, Verifier, VerifierConfig, VerifyError};
