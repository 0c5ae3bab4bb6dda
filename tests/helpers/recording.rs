//! Recording collaborators
//!
//! In-process stand-ins for the mail transport and the text generator.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use EventDesk::services::{MailTransport, TextGenerator};
use EventDesk::utils::errors::{GenerationError, GenerationResult, MailError, MailResult};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail transport that keeps every message and fails for chosen recipients
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: Mutex<HashSet<String>>,
    attempts: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent().into_iter().filter(|m| m.to == recipient).collect()
    }

    /// Every recipient a send was attempted for, failures included
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        self.attempts.lock().unwrap().push(to.to_string());
        if self.failing.lock().unwrap().contains(to) {
            return Err(MailError::Transport(format!("550 mailbox unavailable: {}", to)));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// How the scripted generator answers
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Fail,
    Delay(Duration),
}

/// Text generator with a fixed behaviour that records its prompts
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(Script::Fail)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _model: &str) -> GenerationResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail => Err(GenerationError::ServiceUnavailable),
            Script::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("Late reply".to_string())
            }
        }
    }
}
