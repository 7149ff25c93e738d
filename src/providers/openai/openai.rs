use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::claims::media::jpeg_data_uri;
use crate::config::ProviderConfig;
use crate::providers::traits::CompletionProvider;
use async_openai::{
    types::{
        CreateChatCompletionRequestArgs,
        ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent,
        Role,
    },
    Client,
    config::OpenAIConfig,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct VisionChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u16,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a, ChatPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a, P> {
    Text(&'a str),
    Parts(Vec<P>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ChatPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct FileResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    max_output_tokens: u16,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: MessageContent<'a, InputPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputPart<'a> {
    InputText { text: &'a str },
    InputFile { file_id: &'a str },
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsesOutput {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputPart>,
}

#[derive(Debug, Deserialize)]
struct OutputPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// OpenAI-backed provider.
///
/// Plain text completions go through `async-openai`; the vision, file and
/// responses endpoints are called directly over `reqwest` with typed bodies.
#[derive(Clone)]
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.clone())
            .with_api_base(config.api_base.clone());

        Self {
            client: Client::with_config(openai_config),
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base, path)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.http
            .post(self.endpoint(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    fn vision_request<'a>(&'a self, system: &'a str, task: &'a str, jpeg: &[u8]) -> VisionChatRequest<'a> {
        VisionChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: MessageContent::Text(system) },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ChatPart::Text { text: task },
                        ChatPart::ImageUrl { image_url: ImageUrl { url: jpeg_data_uri(jpeg) } },
                    ]),
                },
            ],
            max_tokens: self.config.image_max_tokens,
        }
    }

    fn file_request<'a>(&'a self, system: &'a str, task: &'a str, file_id: &'a str) -> FileResponsesRequest<'a> {
        FileResponsesRequest {
            model: &self.config.model,
            input: vec![
                InputMessage { role: "system", content: MessageContent::Text(system) },
                InputMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        InputPart::InputText { text: task },
                        InputPart::InputFile { file_id },
                    ]),
                },
            ],
            max_output_tokens: self.config.document_max_tokens,
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
    }

    let response_json: Value = response.json().await?;

    if let Some(error) = response_json.get("error").filter(|e| !e.is_null()) {
        return Err(anyhow!("API returned error: {}", error));
    }

    serde_json::from_value(response_json)
        .map_err(|e| anyhow!("Unexpected API response shape: {}", e))
}

/// Pulls the assistant text out of a chat completion.
pub(crate) fn chat_completion_text(completion: ChatCompletion) -> Result<String> {
    completion.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| anyhow!("No response content in chat completion"))
}

/// Concatenates every `output_text` part of a responses payload.
pub(crate) fn responses_output_text(response: ResponsesOutput) -> Result<String> {
    let text: String = response.output
        .into_iter()
        .flat_map(|item| item.content)
        .filter(|part| part.kind == "output_text")
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(anyhow!("No output text in response"));
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete_with_image(&self, system: &str, task: &str, jpeg: &[u8]) -> Result<String> {
        let body = self.vision_request(system, task, jpeg);
        let completion: ChatCompletion = self.post_json("chat/completions", &body).await?;
        chat_completion_text(completion)
    }

    async fn upload_document(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let form = Form::new()
            .text("purpose", "assistants")
            .part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self.http
            .post(self.endpoint("files"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadedFile = read_json(response).await?;
        Ok(uploaded.id)
    }

    async fn complete_with_file(&self, system: &str, task: &str, file_id: &str) -> Result<String> {
        let body = self.file_request(system, task, file_id);
        let response: ResponsesOutput = self.post_json("responses", &body).await?;
        responses_output_text(response)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .max_tokens(self.config.answer_max_tokens)
            .messages(vec![
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        role: Role::System,
                        content: system.to_string(),
                        name: None,
                    }
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        role: Role::User,
                        content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                        name: None,
                    }
                ),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response.choices.first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("No response content"))
    }

    fn get_model_info(&self) -> String {
        self.config.model.clone()
    }
}
