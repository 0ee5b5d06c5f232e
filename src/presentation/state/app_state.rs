use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{CaptionRetrieval, Dispatcher, ProviderRegistry};
use crate::domain::CallbackNotification;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub retrieval: Arc<CaptionRetrieval>,
    pub registry: Arc<ProviderRegistry>,
    /// Producer half of the callback intake queue; enqueuing never blocks.
    pub callback_sender: mpsc::UnboundedSender<CallbackNotification>,
}
