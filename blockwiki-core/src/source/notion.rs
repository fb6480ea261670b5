//! Notion REST API client and JSON conversion.

use super::{ChildListing, ContentSource, PageListing, SourceError};
use crate::config::NotionConfig;
use async_trait::async_trait;
use blockwiki_types::{
    Annotations, BlockId, BlockKind, HeadingLevel, Icon, ImageSource, ListKind, Mention, PageMeta,
    RichText, SourceBlock,
};
use serde_json::{json, Value};
use tracing::debug;

const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

static NULL: Value = Value::Null;

/// Pages of one database, read through the Notion API
pub struct NotionSource {
    client: reqwest::Client,
    api_base: String,
    secret: String,
    database_id: String,
    title_property: String,
    filename_property: String,
}

impl NotionSource {
    pub fn new(client: reqwest::Client, config: &NotionConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret: config.secret.clone(),
            database_id: config.database_id.clone(),
            title_property: config.title_property.clone(),
            filename_property: config.filename_property.clone(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, SourceError> {
        let response = request
            .bearer_auth(&self.secret)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentSource for NotionSource {
    async fn list_pages(&self, cursor: Option<&str>) -> Result<PageListing, SourceError> {
        let url = format!("{}/databases/{}/query", self.api_base, self.database_id);
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response = self.send(self.client.post(url).json(&body)).await?;
        let pages = results(&response)?
            .iter()
            .map(|page| page_from_json(page, &self.title_property, &self.filename_property))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Listed {} pages", pages.len());

        Ok(PageListing {
            pages,
            next_cursor: next_cursor(&response),
        })
    }

    async fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<ChildListing, SourceError> {
        let url = format!("{}/blocks/{}/children", self.api_base, block_id);
        let mut query = vec![("page_size", PAGE_SIZE.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor.to_string()));
        }

        let response = self.send(self.client.get(url).query(&query)).await?;
        let blocks = results(&response)?
            .iter()
            .map(block_from_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChildListing {
            blocks,
            next_cursor: next_cursor(&response),
        })
    }
}

fn results(response: &Value) -> Result<&Vec<Value>, SourceError> {
    response
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Malformed("missing results array".into()))
}

/// Cursor for the next request, only while `has_more` is set
fn next_cursor(response: &Value) -> Option<String> {
    if !response.get("has_more").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }
    response
        .get("next_cursor")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn required_id(value: &Value) -> Result<BlockId, SourceError> {
    str_field(value, "id")
        .map(BlockId::from)
        .ok_or_else(|| SourceError::Malformed("object without id".into()))
}

/// Concatenated plain text of a rich text array
fn plain(items: Option<&Value>) -> String {
    items
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    str_field(item, "plain_text")
                        .or_else(|| item.get("text").and_then(|t| str_field(t, "content")))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn icon_from_json(icon: &Value) -> Option<Icon> {
    match str_field(icon, "type")? {
        "emoji" => Some(Icon::Emoji {
            emoji: str_field(icon, "emoji")?.to_string(),
        }),
        "external" => Some(Icon::External {
            url: str_field(icon.get("external")?, "url")?.to_string(),
        }),
        other => {
            debug!("Ignoring {} icon", other);
            None
        }
    }
}

/// Page metadata from a database query result
pub fn page_from_json(
    page: &Value,
    title_property: &str,
    filename_property: &str,
) -> Result<PageMeta, SourceError> {
    let id = required_id(page)?;
    let properties = page.get("properties");

    let title_prop = properties
        .and_then(|p| p.get(title_property))
        .ok_or_else(|| SourceError::Malformed(format!("page {} has no {} property", id, title_property)))?;
    let title = plain(title_prop.get("title"));

    let filename = properties
        .and_then(|p| p.get(filename_property))
        .map(|prop| plain(prop.get("rich_text")))
        .filter(|name| !name.trim().is_empty());

    let icon = page.get("icon").and_then(icon_from_json);

    Ok(PageMeta {
        id,
        title,
        icon,
        filename,
    })
}

/// One rich text item; unknown kinds become `RichText::Unknown`
pub fn rich_text_from_json(item: &Value) -> RichText {
    let kind = str_field(item, "type").unwrap_or("unknown");
    match kind {
        "text" => {
            let text = item.get("text");
            let content = text
                .and_then(|t| str_field(t, "content"))
                .unwrap_or_default()
                .to_string();
            let link = text
                .and_then(|t| t.get("link"))
                .and_then(|l| str_field(l, "url"))
                .map(str::to_string);
            let annotations = item
                .get("annotations")
                .and_then(|a| serde_json::from_value::<Annotations>(a.clone()).ok())
                .unwrap_or_default();
            RichText::Text {
                content,
                annotations,
                link,
            }
        }
        "mention" => {
            let mention = item.get("mention").unwrap_or(&NULL);
            let mention = match str_field(mention, "type") {
                Some("page") => match mention.get("page").and_then(|p| str_field(p, "id")) {
                    Some(id) => Mention::Page { id: id.into() },
                    None => Mention::Unknown {
                        kind: "page".into(),
                    },
                },
                Some("date") => {
                    let date = mention.get("date").unwrap_or(&NULL);
                    match str_field(date, "start") {
                        Some(start) => Mention::Date {
                            start: start.to_string(),
                            end: str_field(date, "end").map(str::to_string),
                        },
                        None => Mention::Unknown {
                            kind: "date".into(),
                        },
                    }
                }
                other => Mention::Unknown {
                    kind: other.unwrap_or("unknown").to_string(),
                },
            };
            RichText::Mention {
                mention,
                label: None,
            }
        }
        "equation" => RichText::Equation {
            expression: item
                .get("equation")
                .and_then(|e| str_field(e, "expression"))
                .unwrap_or_default()
                .to_string(),
        },
        other => RichText::Unknown {
            kind: other.to_string(),
        },
    }
}

/// Rich text of a block payload; both `rich_text` and the older `text` key
fn payload_text(payload: &Value) -> Vec<RichText> {
    payload
        .get("rich_text")
        .or_else(|| payload.get("text"))
        .and_then(Value::as_array)
        .map(|items| items.iter().map(rich_text_from_json).collect())
        .unwrap_or_default()
}

/// One block from a children listing
pub fn block_from_json(block: &Value) -> Result<SourceBlock, SourceError> {
    let id = required_id(block)?;
    let kind_name = str_field(block, "type")
        .ok_or_else(|| SourceError::Malformed(format!("block {} has no type", id)))?;
    let has_children = block
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let payload = block.get(kind_name).unwrap_or(&NULL);
    let text = || payload_text(payload);

    let kind = match kind_name {
        "paragraph" => BlockKind::Paragraph { text: text() },
        "heading_1" | "heading_2" | "heading_3" => {
            let level = kind_name
                .strip_prefix("heading_")
                .and_then(|n| n.parse().ok())
                .and_then(HeadingLevel::from_u8)
                .unwrap_or(HeadingLevel::H1);
            BlockKind::Heading {
                level,
                text: text(),
            }
        }
        "bulleted_list_item" => BlockKind::ListItem {
            list: ListKind::Bulleted,
            text: text(),
        },
        "numbered_list_item" => BlockKind::ListItem {
            list: ListKind::Numbered,
            text: text(),
        },
        "toggle" => BlockKind::Toggle { text: text() },
        "quote" => BlockKind::Quote { text: text() },
        "to_do" => BlockKind::ToDo {
            checked: payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            text: text(),
        },
        "code" => BlockKind::Code {
            language: str_field(payload, "language")
                .unwrap_or("plain text")
                .to_string(),
            text: text(),
        },
        "equation" => BlockKind::Equation {
            expression: str_field(payload, "expression")
                .unwrap_or_default()
                .to_string(),
        },
        "image" => {
            let source = match str_field(payload, "type") {
                Some("file") => payload
                    .get("file")
                    .and_then(|f| str_field(f, "url"))
                    .map(|url| ImageSource::Hosted {
                        url: url.to_string(),
                    }),
                Some("external") => payload
                    .get("external")
                    .and_then(|f| str_field(f, "url"))
                    .map(|url| ImageSource::External {
                        url: url.to_string(),
                    }),
                _ => None,
            }
            .unwrap_or_else(|| ImageSource::Unknown {
                kind: str_field(payload, "type").unwrap_or("unknown").to_string(),
            });
            let caption = payload
                .get("caption")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(rich_text_from_json).collect())
                .unwrap_or_default();
            BlockKind::Image { source, caption }
        }
        "callout" => BlockKind::Callout {
            icon: payload.get("icon").and_then(icon_from_json),
            text: text(),
        },
        "embed" => match str_field(payload, "url") {
            Some(url) => BlockKind::Embed {
                url: url.to_string(),
            },
            None => BlockKind::Unknown {
                kind: kind_name.to_string(),
            },
        },
        "link_to_page" => match payload.get("page_id").and_then(Value::as_str) {
            Some(page_id) => BlockKind::LinkToPage {
                page_id: page_id.into(),
            },
            None => BlockKind::Unknown {
                kind: format!("link_to_page:{}", str_field(payload, "type").unwrap_or("unknown")),
            },
        },
        "divider" => BlockKind::Divider,
        "unsupported" => BlockKind::Unsupported,
        other => BlockKind::Unknown {
            kind: other.to_string(),
        },
    };

    Ok(SourceBlock {
        id,
        kind,
        has_children,
    })
}
