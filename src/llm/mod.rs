pub mod queue;
pub mod types;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::LlmError;

pub use queue::{LLMQueue, Priority};
pub use types::{ChatMessage, ChatReply, ChatRequest, ToolCall, ToolSpec};

/// Anything that can answer a chat completion request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError>;
}

/// OpenAI-compatible chat client
#[derive(Clone)]
pub struct LLMClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
    pub temperature: Option<f32>,
}

impl LLMClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let client = Client::with_config(config);
        Self {
            client,
            model,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn to_openai_message(message: ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
        let message = match message {
            ChatMessage::System(content) => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(content)
                    .build()?,
            ),
            ChatMessage::User(content) => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(content)
                    .build()?,
            ),
            ChatMessage::Assistant { content, tool_calls } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if let Some(content) = content {
                    args.content(content);
                }
                if !tool_calls.is_empty() {
                    args.tool_calls(
                        tool_calls
                            .into_iter()
                            .map(|call| ChatCompletionMessageToolCall {
                                id: call.id,
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: call.name,
                                    arguments: call.arguments,
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }
                ChatCompletionRequestMessage::Assistant(args.build()?)
            }
            ChatMessage::Tool { tool_call_id, content } => ChatCompletionRequestMessage::Tool(
                ChatCompletionRequestToolMessageArgs::default()
                    .content(content)
                    .tool_call_id(tool_call_id)
                    .build()?,
            ),
        };
        Ok(message)
    }

    fn to_openai_tool(spec: ToolSpec) -> Result<ChatCompletionTool, LlmError> {
        let tool = ChatCompletionToolArgs::default()
            .r#type(ChatCompletionToolType::Function)
            .function(
                FunctionObjectArgs::default()
                    .name(spec.name)
                    .description(spec.description)
                    .parameters(spec.parameters)
                    .build()?,
            )
            .build()?;
        Ok(tool)
    }
}

#[async_trait]
impl ChatBackend for LLMClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError> {
        info!(
            "🤖 Sending request to LLM (Model: {}, messages: {}, tools: {})...",
            self.model,
            request.messages.len(),
            request.tools.len()
        );

        let messages = request
            .messages
            .into_iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if !request.tools.is_empty() {
            let tools = request
                .tools
                .into_iter()
                .map(Self::to_openai_tool)
                .collect::<Result<Vec<_>, _>>()?;
            builder.tools(tools);
        }
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        let openai_request = builder.build()?;

        let response = self.client.chat().create(openai_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        info!("🤖 LLM Response received ({} tool calls).", tool_calls.len());
        debug!("🤖 LLM content: {:?}", choice.message.content);

        Ok(ChatReply {
            content: choice.message.content,
            tool_calls,
        })
    }
}
