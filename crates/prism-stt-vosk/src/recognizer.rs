use std::fs;

use tracing::{info, warn};
use vosk::{CompleteResult, DecodingState, Model, Recognizer};

use prism_foundation::SttError;
use prism_stt::RecognizerConfig;

/// Offline recognizer backed by a Vosk acoustic+language model.
pub struct VoskRecognizer {
    recognizer: Recognizer,
}

impl VoskRecognizer {
    /// Load the model and build a recognizer.
    ///
    /// Loading can take a while for large models, so callers are
    /// expected to have recording running already; the pipe buffers
    /// whatever is spoken in the meantime.
    pub fn new(config: &RecognizerConfig) -> Result<Self, SttError> {
        if !config.model_dir.exists() {
            return Err(SttError::ModelNotFound {
                path: config.model_dir.clone(),
            });
        }

        let grammar = match &config.grammar_file {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|source| SttError::GrammarRead {
                    path: path.clone(),
                    source,
                })?;
                let phrases: Vec<String> =
                    serde_json::from_str(&json).map_err(|err| SttError::GrammarParse {
                        path: path.clone(),
                        reason: err.to_string(),
                    })?;
                Some(phrases)
            }
            None => None,
        };

        info!("Loading model...");
        let model = Model::new(config.model_dir.to_string_lossy().into_owned()).ok_or_else(|| {
            SttError::ModelLoadFailed {
                path: config.model_dir.clone(),
            }
        })?;

        let sample_rate = config.sample_rate as f32;
        let recognizer = match &grammar {
            Some(phrases) => {
                Recognizer::new_with_grammar(&model, sample_rate, phrases.as_slice())
            }
            None => Recognizer::new(&model, sample_rate),
        }
        .ok_or(SttError::RecognizerInit {
            sample_rate: config.sample_rate,
        })?;
        info!("Model loaded.");

        Ok(Self { recognizer })
    }

    fn complete_text(result: CompleteResult) -> String {
        match result {
            CompleteResult::Single(single) => single.text.to_string(),
            CompleteResult::Multiple(multiple) => multiple
                .alternatives
                .first()
                .map(|alt| alt.text.to_string())
                .unwrap_or_default(),
        }
    }
}

impl prism_stt::Recognizer for VoskRecognizer {
    fn accept(&mut self, pcm: &[i16]) -> Result<bool, SttError> {
        let state = self
            .recognizer
            .accept_waveform(pcm)
            .map_err(|err| SttError::Decode(format!("{err:?}")))?;
        match state {
            DecodingState::Finalized => Ok(true),
            DecodingState::Running => Ok(false),
            DecodingState::Failed => {
                // A bad chunk is not worth ending the session over.
                warn!("recognition failed for the current chunk");
                Ok(false)
            }
        }
    }

    fn final_text(&mut self) -> Result<String, SttError> {
        Ok(Self::complete_text(self.recognizer.final_result()))
    }

    fn partial_text(&mut self) -> Result<String, SttError> {
        Ok(self.recognizer.partial_result().partial.to_string())
    }

    fn reset(&mut self) -> Result<(), SttError> {
        // Vosk has no explicit reset; draining the final result drops
        // the in-flight hypothesis and starts a fresh utterance.
        let _ = self.recognizer.final_result();
        Ok(())
    }
}
