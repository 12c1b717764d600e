//! Breaking-change classification of releases.
//!
//! Release notes are sent to an inference API together with a three-tier
//! rubric. Whatever happens on the way back, a release always leaves this
//! module with a [`Classification`]: failures and unparseable answers turn
//! into a degraded verdict instead of an error.

mod parse;
mod severity;

pub use severity::{Classification, Severity};

use crate::llm::Completion;
use crate::releases::Release;
use async_trait::async_trait;
use parse::parse_response;
use tracing::{info, info_span, warn, Instrument};

/// Longest slice of release notes sent to the model.
const MAX_NOTES_CHARS: usize = 12_000;

/// Assigns a severity to a release.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies `release`. Never fails; see [`Classification::unavailable`].
    async fn classify(&self, release: &Release) -> Classification;
}

/// [`Classifier`] that asks an LLM to apply the severity rubric.
pub struct SeverityClassifier<C> {
    completion: C,
    repository: String,
}

impl<C: Completion> SeverityClassifier<C> {
    /// Creates a classifier for releases of `repository`.
    pub fn new(completion: C, repository: impl Into<String>) -> Self {
        Self {
            completion,
            repository: repository.into(),
        }
    }
}

#[async_trait]
impl<C: Completion> Classifier for SeverityClassifier<C> {
    async fn classify(&self, release: &Release) -> Classification {
        let span = info_span!("classify", release_id = %release.id, tag = %release.tag);

        async {
            let prompt = build_prompt(&self.repository, release);
            match self.completion.complete(&prompt).await {
                Ok(response) => match parse_response(&response) {
                    Some(classification) => {
                        info!(severity = %classification.severity, "Classified release");
                        classification
                    }
                    None => {
                        warn!(
                            response_chars = response.chars().count(),
                            "Model response had no recognisable severity"
                        );
                        Classification::unavailable(
                            "model response did not name a recognised severity",
                        )
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Classification request failed");
                    Classification::unavailable(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Builds the classification prompt for a release.
fn build_prompt(repository: &str, release: &Release) -> String {
    format!(
        "Analyze this {repository} release for breaking changes.\n\
\n\
Release Title: {title}\n\
Tag: {tag}\n\
\n\
Release Notes:\n\
{notes}\n\
\n\
Classify the release into exactly one of these tiers:\n\
\n\
breaking:\n\
- Hard forks or network upgrades\n\
- Consensus rule changes\n\
- Changes to block structure or transaction format\n\
- Removed or modified RPC endpoints\n\
- Database format changes requiring migration\n\
- API breaking changes\n\
\n\
potentially-breaking:\n\
- Major version bumps\n\
- Deprecated features that still work but will be removed\n\
- Configuration changes that may affect existing setups\n\
- Performance changes that significantly alter behavior\n\
\n\
informational:\n\
- Bug fixes\n\
- Minor updates\n\
- Security patches that don't change APIs\n\
- Documentation updates\n\
\n\
Return your analysis as a JSON object with this exact structure:\n\
{{\n\
  \"severity\": \"breaking\" | \"potentially-breaking\" | \"informational\",\n\
  \"reason\": \"Brief explanation of why this is/isn't breaking\",\n\
  \"affected_components\": [\"list\", \"of\", \"affected\", \"components\"]\n\
}}\n\
\n\
Return ONLY the JSON object, no other text.",
        title = release.title,
        tag = release.tag,
        notes = truncate_chars(&release.notes, MAX_NOTES_CHARS),
    )
}

/// Truncates `text` to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
    }
}
