use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cortex_core::errors::{CortexResult, ReasonerError};
use cortex_core::models::{EntityType, FeedbackSignalType, MemoryType, MentionType, RelationType};
use cortex_core::traits::{
    CandidateMemory, EpisodeStructure, ExtractedEntity, ExtractedRelationship,
    ImplicitFeedbackItem, LanguageReasoner, ProcedureCandidate, SchemaPattern,
};

/// Adapter for any chat-completion endpoint that speaks the OpenAI
/// `/chat/completions` shape. Every capability method is one request with
/// a task-specific system prompt asking for a JSON object back; malformed
/// JSON surfaces as `ReasonerError::MalformedOutput` rather than a panic.
pub struct OpenAiCompatibleReasoner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl OpenAiCompatibleReasoner {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        request_timeout_ms: u64,
        max_retries: u32,
    ) -> CortexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| ReasonerError::Request { message: e.to_string() })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            max_retries,
        })
    }

    async fn complete_json(&self, system_prompt: &str, user_content: &str) -> CortexResult<serde_json::Value> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_content },
            ],
        };
        let mut attempt = 0;
        loop {
            let mut req = self.client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                req = req.bearer_auth(key);
            }
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    let parsed: ChatResponse = resp
                        .json()
                        .await
                        .map_err(|e| ReasonerError::Request { message: e.to_string() })?;
                    let content = parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| c.message.content)
                        .ok_or_else(|| ReasonerError::MalformedOutput {
                            message: "no choices in response".to_string(),
                        })?;
                    return serde_json::from_str(&content).map_err(|e| {
                        ReasonerError::MalformedOutput { message: e.to_string() }.into()
                    });
                }
                Ok(resp) => {
                    let status = resp.status();
                    if attempt >= self.max_retries {
                        return Err(ReasonerError::Unavailable {
                            message: format!("reasoner endpoint returned {status}"),
                        }
                        .into());
                    }
                    tracing::warn!(%status, attempt, "reasoner request failed, retrying");
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(ReasonerError::Unavailable { message: e.to_string() }.into());
                    }
                    tracing::warn!(error = %e, attempt, "reasoner request failed, retrying");
                }
            }
            attempt += 1;
            tokio::time::sleep(std::time::Duration::from_millis(200 * attempt as u64)).await;
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LanguageReasoner for OpenAiCompatibleReasoner {
    async fn classify(&self, content: &str) -> CortexResult<MemoryType> {
        let value = self
            .complete_json(
                "Classify the memory as one of preference, fact, decision, constraint. \
                 Respond as JSON: {\"memory_type\": \"...\"}.",
                content,
            )
            .await?;
        let memory_type = value
            .get("memory_type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ReasonerError::MalformedOutput {
                message: "missing memory_type".to_string(),
            })?;
        parse_memory_type(memory_type)
    }

    async fn extract(&self, conversation: &str) -> CortexResult<Vec<CandidateMemory>> {
        let value = self
            .complete_json(
                "Extract candidate memories from the conversation. Respond as JSON: \
                 {\"memories\": [{\"content\": \"...\", \"memory_type\": \"...\", \"evidence\": \"...\"}]}.",
                conversation,
            )
            .await?;
        let items = value.get("memories").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        items
            .into_iter()
            .map(|item| {
                let memory_type = item
                    .get("memory_type")
                    .and_then(|v| v.as_str())
                    .map(parse_memory_type)
                    .transpose()?
                    .unwrap_or(MemoryType::Fact);
                Ok(CandidateMemory {
                    content: item.get("content").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    memory_type,
                    evidence: item.get("evidence").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    async fn summarize(&self, memories: &[String]) -> CortexResult<String> {
        let value = self
            .complete_json(
                "Summarize the following memories in one or two sentences. Respond as JSON: {\"summary\": \"...\"}.",
                &memories.join("\n"),
            )
            .await?;
        Ok(value.get("summary").and_then(|v| v.as_str()).unwrap_or_default().to_string())
    }

    async fn check_contradiction(&self, a: &str, b: &str) -> CortexResult<bool> {
        let value = self
            .complete_json(
                "Do these two statements contradict each other? Respond as JSON: {\"contradicts\": true|false}.",
                &format!("A: {a}\nB: {b}"),
            )
            .await?;
        Ok(value.get("contradicts").and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn extract_episode_structure(&self, raw_content: &str) -> CortexResult<EpisodeStructure> {
        let value = self
            .complete_json(
                "Extract structure from this episode. Respond as JSON: {\"entities\": [..], \"topics\": [..], \
                 \"causal_links\": [{\"cause\": \"..\", \"effect\": \"..\", \"confidence\": 0.0}], \
                 \"valence\": 0.0, \"intensity\": 0.0, \"importance_score\": 0.0}.",
                raw_content,
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| ReasonerError::MalformedOutput { message: e.to_string() }.into())
    }

    async fn extract_procedure(&self, episode_contents: &[String]) -> CortexResult<ProcedureCandidate> {
        let value = self
            .complete_json(
                "Distill a reusable procedure from these episodes. Respond as JSON: \
                 {\"trigger_pattern\": \"..\", \"trigger_keywords\": [..], \"action_template\": \"..\", \"action_type\": \"..\"}.",
                &episode_contents.join("\n"),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| ReasonerError::MalformedOutput { message: e.to_string() }.into())
    }

    async fn detect_schema_pattern(&self, cluster_contents: &[String]) -> CortexResult<SchemaPattern> {
        let value = self
            .complete_json(
                "Name and describe the pattern shared by these memories. Respond as JSON: \
                 {\"name\": \"..\", \"description\": \"..\", \"applicable_contexts\": [..]}.",
                &cluster_contents.join("\n"),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| ReasonerError::MalformedOutput { message: e.to_string() }.into())
    }

    async fn detect_implicit_feedback(
        &self,
        conversation: &str,
        recalled_memories: &[(String, String)],
    ) -> CortexResult<Vec<ImplicitFeedbackItem>> {
        let context = recalled_memories
            .iter()
            .map(|(id, content)| format!("{id}: {content}"))
            .collect::<Vec<_>>()
            .join("\n");
        let value = self
            .complete_json(
                "Given the conversation and the recalled memories, infer implicit feedback. \
                 Respond as JSON: {\"signals\": [{\"memory_id\": \"..\", \"signal_type\": \"..\", \
                 \"confidence\": 0.0, \"evidence\": \"..\"}]}.",
                &format!("Conversation:\n{conversation}\n\nRecalled:\n{context}"),
            )
            .await?;
        let items = value.get("signals").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        items
            .into_iter()
            .map(|item| {
                let signal_type = item
                    .get("signal_type")
                    .and_then(|v| v.as_str())
                    .map(parse_feedback_signal_type)
                    .transpose()?
                    .unwrap_or(FeedbackSignalType::Used);
                Ok(ImplicitFeedbackItem {
                    memory_id: item.get("memory_id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    signal_type,
                    confidence: item.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.5),
                    evidence: item.get("evidence").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    async fn extract_entities(&self, text: &str) -> CortexResult<Vec<ExtractedEntity>> {
        let value = self
            .complete_json(
                "Extract named entities. Respond as JSON: {\"entities\": [{\"name\": \"..\", \
                 \"entity_type\": \"..\", \"mention_type\": \"..\"}]}.",
                text,
            )
            .await?;
        let items = value.get("entities").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        items
            .into_iter()
            .map(|item| {
                Ok(ExtractedEntity {
                    name: item.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    entity_type: item
                        .get("entity_type")
                        .and_then(|v| v.as_str())
                        .map(parse_entity_type)
                        .transpose()?
                        .unwrap_or(EntityType::Other),
                    mention_type: item
                        .get("mention_type")
                        .and_then(|v| v.as_str())
                        .map(parse_mention_type)
                        .transpose()?
                        .unwrap_or(MentionType::Context),
                })
            })
            .collect()
    }

    async fn detect_relationships(
        &self,
        entities: &[ExtractedEntity],
        text: &str,
    ) -> CortexResult<Vec<ExtractedRelationship>> {
        let names = entities.iter().map(|e| e.name.clone()).collect::<Vec<_>>().join(", ");
        let value = self
            .complete_json(
                "Given these entities and the source text, propose relationships. Respond as JSON: \
                 {\"relationships\": [{\"source\": \"..\", \"target\": \"..\", \"relation_type\": \"..\", \"strength\": 0.0}]}.",
                &format!("Entities: {names}\nText: {text}"),
            )
            .await?;
        let items = value.get("relationships").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        items
            .into_iter()
            .map(|item| {
                Ok(ExtractedRelationship {
                    source: item.get("source").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    target: item.get("target").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    relation_type: item
                        .get("relation_type")
                        .and_then(|v| v.as_str())
                        .map(parse_relation_type)
                        .transpose()?
                        .unwrap_or(RelationType::Thematic),
                    strength: item.get("strength").and_then(|v| v.as_f64()).unwrap_or(0.5),
                })
            })
            .collect()
    }
}

fn parse_memory_type(s: &str) -> CortexResult<MemoryType> {
    Ok(match s {
        "preference" => MemoryType::Preference,
        "fact" => MemoryType::Fact,
        "decision" => MemoryType::Decision,
        "constraint" => MemoryType::Constraint,
        other => {
            return Err(ReasonerError::MalformedOutput {
                message: format!("unknown memory_type: {other}"),
            }
            .into())
        }
    })
}

fn parse_feedback_signal_type(s: &str) -> CortexResult<FeedbackSignalType> {
    Ok(match s {
        "helpful" => FeedbackSignalType::Helpful,
        "unhelpful" => FeedbackSignalType::Unhelpful,
        "used" => FeedbackSignalType::Used,
        "ignored" => FeedbackSignalType::Ignored,
        "contradicted" => FeedbackSignalType::Contradicted,
        "outdated" => FeedbackSignalType::Outdated,
        other => {
            return Err(ReasonerError::MalformedOutput {
                message: format!("unknown signal_type: {other}"),
            }
            .into())
        }
    })
}

fn parse_entity_type(s: &str) -> CortexResult<EntityType> {
    Ok(match s {
        "person" => EntityType::Person,
        "organization" => EntityType::Organization,
        "tool" => EntityType::Tool,
        "concept" => EntityType::Concept,
        "location" => EntityType::Location,
        "event" => EntityType::Event,
        "product" => EntityType::Product,
        _ => EntityType::Other,
    })
}

fn parse_mention_type(s: &str) -> CortexResult<MentionType> {
    Ok(match s {
        "subject" => MentionType::Subject,
        "object" => MentionType::Object,
        _ => MentionType::Context,
    })
}

fn parse_relation_type(s: &str) -> CortexResult<RelationType> {
    Ok(match s {
        "entity_link" => RelationType::EntityLink,
        "causal" => RelationType::Causal,
        "temporal" => RelationType::Temporal,
        "thematic" => RelationType::Thematic,
        "contradicts" => RelationType::Contradicts,
        "supports" => RelationType::Supports,
        "derived_from" => RelationType::DerivedFrom,
        "supersedes" => RelationType::Supersedes,
        _ => RelationType::Thematic,
    })
}
