//! Suggested observation text for the routine form.
//!
//! Generation is a convenience: the service never fails, it falls back to a
//! fixed sentence whenever the generator is missing or misbehaves.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Used when the generator answered with nothing
pub const EMPTY_RESPONSE_FALLBACK: &str = "The day was wonderful and full of discoveries!";

/// Used when the generator is unavailable or failed
pub const FAILURE_FALLBACK: &str =
    "The day was very productive and the child joyfully took part in every activity.";

const BLANK_ACTIVITIES: &str = "interaction and learning";

/// A black-box text generator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedObservation {
    pub text: String,
    /// False when a fallback sentence was returned
    pub generated: bool,
}

impl GeneratedObservation {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            generated: false,
        }
    }
}

#[derive(Clone)]
pub struct SummaryService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SummaryService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        if generator.is_none() {
            info!("No text generator configured, observations will use the fallback sentence");
        }
        Self { generator }
    }

    /// Write a short warm observation from the activities keywords
    pub async fn generate_observation(&self, activities: &str) -> GeneratedObservation {
        let Some(generator) = &self.generator else {
            return GeneratedObservation::fallback(FAILURE_FALLBACK);
        };

        let prompt = build_prompt(activities);
        match generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => GeneratedObservation {
                text: text.trim().to_string(),
                generated: true,
            },
            Ok(_) => {
                warn!("Text generator returned an empty observation");
                GeneratedObservation::fallback(EMPTY_RESPONSE_FALLBACK)
            }
            Err(e) => {
                warn!("Text generation failed: {:#}", e);
                GeneratedObservation::fallback(FAILURE_FALLBACK)
            }
        }
    }
}

pub fn build_prompt(activities: &str) -> String {
    let keywords = match activities.trim() {
        "" => BLANK_ACTIVITIES,
        trimmed => trimmed,
    };
    format!(
        "As a caring early-childhood teacher, write a short and positive observation for the \
         school agenda based on these keywords: {}. Be empathetic with the parents and use a \
         warm tone.",
        keywords
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedGenerator {
        reply: anyhow::Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn new(reply: anyhow::Result<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    #[tokio::test]
    async fn test_generated_text_is_trimmed() {
        let generator = CannedGenerator::new(Ok("  Lia loved painting today!\n".to_string()));
        let service = SummaryService::new(Some(generator.clone()));

        let result = service.generate_observation("painting").await;

        assert_eq!(result.text, "Lia loved painting today!");
        assert!(result.generated);
        assert!(generator.prompts.lock().unwrap()[0].contains("keywords: painting."));
    }

    #[tokio::test]
    async fn test_blank_activities_use_generic_keywords() {
        let generator = CannedGenerator::new(Ok("Nice day".to_string()));
        let service = SummaryService::new(Some(generator.clone()));

        service.generate_observation("   ").await;

        assert!(generator.prompts.lock().unwrap()[0].contains("interaction and learning"));
    }

    #[tokio::test]
    async fn test_fallbacks() {
        let empty = SummaryService::new(Some(CannedGenerator::new(Ok("  ".to_string()))));
        assert_eq!(
            empty.generate_observation("music").await,
            GeneratedObservation::fallback(EMPTY_RESPONSE_FALLBACK)
        );

        let failing = SummaryService::new(Some(CannedGenerator::new(Err(anyhow::anyhow!("timeout")))));
        assert_eq!(
            failing.generate_observation("music").await,
            GeneratedObservation::fallback(FAILURE_FALLBACK)
        );

        let missing = SummaryService::new(None);
        assert_eq!(
            missing.generate_observation("music").await,
            GeneratedObservation::fallback(FAILURE_FALLBACK)
        );
    }
}
