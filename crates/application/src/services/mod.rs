//! Application services

mod chat_pipeline;

pub use chat_pipeline::{
    AssistantReply, ChatPipeline, MessageSource, PipelineConfig, ResolvedUserMessage,
    VoiceTurnOutcome,
};
