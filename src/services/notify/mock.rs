use async_trait::async_trait;
use tracing::info;

use super::NotifyAdapter;
use crate::error::AppResult;
use crate::models::{Content, DeliveryReceipt};
use crate::services::adapter::ProviderAdapter;

/// Logs the notification instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct MockNotifyAdapter;

impl MockNotifyAdapter {
    /// `[LEVEL] subject\nmessage`, or `[LEVEL] message` without a subject
    pub fn render(content: &Content) -> String {
        match content.subject() {
            Some(subject) => format!("{} {}\n{}", content.level.tag(), subject, content.message),
            None => format!("{} {}", content.level.tag(), content.message),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MockNotifyAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl NotifyAdapter for MockNotifyAdapter {
    async fn send(&self, content: &Content) -> AppResult<DeliveryReceipt> {
        info!(level = content.level.as_str(), "[mock] notification\n{}", Self::render(content));
        Ok(DeliveryReceipt::new("mock", None, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    #[test]
    fn test_render_with_subject() {
        let content = Content::new("disk at 91%")
            .with_subject("db-1")
            .with_level(Level::Warning);
        assert_eq!(MockNotifyAdapter::render(&content), "[WARNING] db-1\ndisk at 91%");
    }

    #[test]
    fn test_render_without_subject() {
        let content = Content::new("deploy finished");
        assert_eq!(MockNotifyAdapter::render(&content), "[INFO] deploy finished");
    }
}
