//! Gemini reasoning client
//!
//! Calls the generateContent API with the rendered instruction and, when the
//! unit is bound to the store, advertises the store operations as callable
//! functions. Function calls from the model are dispatched through the bound
//! capability, so the read/write gate applies to whatever the model asks for.

use crate::reasoning::response::{ReasoningError, UnitPayload, UnitReply};
use crate::reasoning::ReasoningUnit;
use crate::store::{AccessMode, DebateRecord, StoreCapability};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct ReasoningClientConfig {
    /// Base URL of the generateContent API
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// API key sent with every request
    pub api_key: String,

    /// Cap on tool-call rounds within one invocation
    pub max_tool_rounds: usize,
}

impl ReasoningClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: api_key.into(),
            max_tool_rounds: 8,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}

/// Production reasoning unit backed by the Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    config: ReasoningClientConfig,
}

impl GeminiClient {
    pub fn new(config: ReasoningClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn generate(
        &self,
        contents: &[Content],
        tools: Option<&Vec<ToolDecl>>,
    ) -> Result<Content, ReasoningError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );
        let request = GenerateRequest {
            contents: contents.to_vec(),
            tools: tools.cloned(),
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReasoningError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::Malformed(e.to_string()))?;

        parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| ReasoningError::Malformed("response carried no candidates".to_string()))
    }
}

#[async_trait]
impl ReasoningUnit for GeminiClient {
    async fn invoke(
        &self,
        instruction: &str,
        store: Option<&StoreCapability>,
    ) -> Result<UnitReply, ReasoningError> {
        debug!("invoking reasoning, instruction length {}", instruction.len());

        let tools = store.map(|cap| vec![tool_declarations(cap.mode())]);
        let mut contents = vec![Content::user_text(instruction)];

        for _round in 0..=self.config.max_tool_rounds {
            let reply = self.generate(&contents, tools.as_ref()).await?;

            let calls: Vec<FunctionCall> = reply
                .parts
                .iter()
                .filter_map(|p| p.function_call.clone())
                .collect();

            if calls.is_empty() {
                let text: String = reply
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect();
                // A side-effect-only unit may legitimately answer with
                // nothing once its tool calls are done.
                if text.trim().is_empty() {
                    return Ok(UnitReply::text(""));
                }
                return Ok(UnitReply::new(UnitPayload::from_response(&text)));
            }

            let Some(cap) = store else {
                warn!("model requested a tool but the unit has no store access");
                return Err(ReasoningError::Malformed(
                    "function call from a unit without store access".to_string(),
                ));
            };

            contents.push(reply.clone());
            for call in calls {
                debug!("dispatching tool call '{}'", call.name);
                let result = dispatch_tool(&call, cap).await?;
                contents.push(Content::function_response(&call.name, result));
            }
        }

        Err(ReasoningError::Api(format!(
            "exceeded {} tool rounds without a final answer",
            self.config.max_tool_rounds
        )))
    }
}

/// Store operations advertised to the model, matched to the capability mode
fn tool_declarations(mode: AccessMode) -> ToolDecl {
    let mut declarations = vec![
        FunctionDecl {
            name: "find_undercut_signals".to_string(),
            description: "List products whose cost price is undercut by a competitor's \
                          detected price, joined from the products and market_signals tables."
                .to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        },
        FunctionDecl {
            name: "check_stock".to_string(),
            description: "Current stock level for one product.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "product_id": {"type": "string"}
                },
                "required": ["product_id"]
            }),
        },
    ];

    if mode.allows_write() {
        declarations.push(FunctionDecl {
            name: "log_debate".to_string(),
            description: "Insert the finished executive debate into the council_debates table."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "undercut_signals": {"type": "string", "description": "JSON list of signals"},
                    "cmo_proposal": {"type": "string"},
                    "cfo_rebuttal": {"type": "string"},
                    "ops_input": {"type": "string"},
                    "ceo_decision": {"type": "string", "description": "JSON verdict object"}
                },
                "required": [
                    "undercut_signals",
                    "cmo_proposal",
                    "cfo_rebuttal",
                    "ops_input",
                    "ceo_decision"
                ]
            }),
        });
    }

    ToolDecl {
        function_declarations: declarations,
    }
}

/// Execute one model-requested tool call through the bound capability
async fn dispatch_tool(
    call: &FunctionCall,
    cap: &StoreCapability,
) -> Result<Value, ReasoningError> {
    match call.name.as_str() {
        "find_undercut_signals" => {
            let signals = cap.undercut_signals().await?;
            Ok(json!({ "signals": signals }))
        }
        "check_stock" => {
            let product_id = call
                .args
                .get("product_id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ReasoningError::Malformed("check_stock call without product_id".to_string())
                })?;
            let level = cap.stock_level(product_id).await?;
            Ok(json!({ "product_id": product_id, "current_stock": level }))
        }
        "log_debate" => {
            let record = debate_from_args(&call.args)?;
            cap.log_debate(&record).await?;
            Ok(json!({ "status": "logged" }))
        }
        other => Err(ReasoningError::Malformed(format!(
            "model called unknown tool '{}'",
            other
        ))),
    }
}

/// Build a debate record from tool-call arguments
///
/// The JSON-valued fields arrive either as JSON-encoded strings (per the
/// declared schema) or as structured values; both are accepted.
fn debate_from_args(args: &Value) -> Result<DebateRecord, ReasoningError> {
    let text_field = |key: &str| -> Result<String, ReasoningError> {
        args.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ReasoningError::Malformed(format!("log_debate call missing field '{}'", key))
            })
    };
    let json_field = |key: &str| -> Result<Value, ReasoningError> {
        match args.get(key) {
            Some(Value::String(s)) => serde_json::from_str(s).map_err(|e| {
                ReasoningError::Malformed(format!("field '{}' is not valid JSON: {}", key, e))
            }),
            Some(other) => Ok(other.clone()),
            None => Err(ReasoningError::Malformed(format!(
                "log_debate call missing field '{}'",
                key
            ))),
        }
    };

    Ok(DebateRecord {
        undercut_signals: json_field("undercut_signals")?,
        cmo_proposal: text_field("cmo_proposal")?,
        cfo_rebuttal: text_field("cfo_rebuttal")?,
        ops_input: text_field("ops_input")?,
        ceo_decision: json_field("ceo_decision")?,
        decided_at: Utc::now(),
    })
}

// --- wire types ---

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDecl>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user_text(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: Some(text.to_string()),
                ..Part::default()
            }],
        }
    }

    fn function_response(name: &str, response: Value) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: name.to_string(),
                    response,
                }),
                ..Part::default()
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDecl {
    function_declarations: Vec<FunctionDecl>,
}

#[derive(Debug, Clone, Serialize)]
struct FunctionDecl {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
