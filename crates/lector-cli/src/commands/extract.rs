//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::clipboard::SystemClipboard;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_domain::SessionPhase;
use lector_sdk::ExtractionBackend;
use lector_session::{DirectorySink, Workbench};
use std::path::Path;

/// Execute the extract command: one full session from file to text.
pub async fn execute_extract<B: ExtractionBackend + 'static>(
    args: ExtractArgs,
    workbench: &mut Workbench<B>,
    download_dir: &Path,
    formatter: &Formatter,
) -> Result<()> {
    if let Err(e) = workbench.select_file(&args.image).await {
        formatter.print_notices(&workbench.take_notices());
        return Err(e.into());
    }

    if let Some(preset) = args.preset {
        workbench.select_preset(preset.into());
    } else if let Some(prompt) = args.prompt {
        workbench.set_prompt(prompt);
    }

    if workbench.submit().is_none() {
        return Err(CliError::InvalidInput("Nothing to submit".to_string()));
    }
    workbench.settle().await;

    if args.copy {
        workbench.copy_to_clipboard(&mut SystemClipboard::new());
    }
    if args.export {
        let dir = args.dir.as_deref().unwrap_or(download_dir);
        workbench.export(&DirectorySink::new(dir)).await;
    }

    let view = workbench.view();
    println!("{}", formatter.format_result(&view)?);
    formatter.print_notices(&workbench.take_notices());

    match (workbench.phase(), view.error) {
        (SessionPhase::Failed, Some(error)) => Err(CliError::ExtractionFailed(error.message)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use async_trait::async_trait;
    use lector_domain::ExtractionRequest;
    use lector_sdk::{ClearCacheReply, ExportDocument, ExtractReply, SdkError};
    use lector_session::SessionConfig;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Answers every extraction with the prompt it was sent
    #[derive(Default)]
    struct EchoBackend {
        prompts: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl ExtractionBackend for EchoBackend {
        async fn extract(&self, request: &ExtractionRequest) -> std::result::Result<ExtractReply, SdkError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            match request.prompt.as_deref() {
                Some("fail") => Ok(ExtractReply::Rejected {
                    status: 200,
                    message: Some("no text found".to_string()),
                }),
                other => Ok(ExtractReply::Extracted(format!("<p>{}</p>", other.unwrap_or("auto")))),
            }
        }

        async fn clear_cache(&self) -> std::result::Result<ClearCacheReply, SdkError> {
            Ok(ClearCacheReply {
                success: true,
                message: None,
            })
        }

        async fn fetch_export(&self) -> std::result::Result<ExportDocument, SdkError> {
            Ok(ExportDocument::new(serde_json::json!({"full_text": "auto"})))
        }
    }

    fn image_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("scan.png");
        std::fs::File::create(&path).unwrap().write_all(&[0x89, b'P', b'N', b'G']).unwrap();
        path
    }

    fn args(image: std::path::PathBuf) -> ExtractArgs {
        ExtractArgs {
            image,
            prompt: None,
            preset: None,
            copy: false,
            export: false,
            dir: None,
        }
    }

    #[tokio::test]
    async fn test_extract_with_preset_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(EchoBackend::default());
        let mut workbench = Workbench::new(Arc::clone(&backend), SessionConfig::default());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let mut args = args(image_file(dir.path()));
        args.preset = Some(crate::cli::PresetArg::Receipt);
        args.export = true;

        execute_extract(args, &mut workbench, dir.path(), &formatter).await.unwrap();

        assert_eq!(workbench.phase(), SessionPhase::Succeeded);
        assert_eq!(
            backend.prompts.lock().unwrap()[0].as_deref(),
            Some(lector_domain::PresetId::Receipt.canonical_text())
        );
        assert!(dir.path().join("extracted_text.json").exists());
    }

    #[tokio::test]
    async fn test_extract_failure_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbench = Workbench::new(Arc::new(EchoBackend::default()), SessionConfig::default());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let mut args = args(image_file(dir.path()));
        args.prompt = Some("fail".to_string());

        let err = execute_extract(args, &mut workbench, dir.path(), &formatter).await.unwrap_err();
        assert!(matches!(err, CliError::ExtractionFailed(ref m) if m == "no text found"));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbench = Workbench::new(Arc::new(EchoBackend::default()), SessionConfig::default());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_extract(args(dir.path().join("notes.txt")), &mut workbench, dir.path(), &formatter)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Session(_)));
        assert_eq!(workbench.phase(), SessionPhase::Idle);
    }
}
