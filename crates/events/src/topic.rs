//! Topic filters for activity subscriptions.
//!
//! A topic is `*` (everything), an entity type (`task`), or a fully
//! qualified entity ref (`task:123`). Subscribers hold a set of filters;
//! an event is delivered when any filter in the set matches.

use copresence_core::types::DbId;

/// A single parsed topic filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicFilter {
    /// Matches every event.
    All,
    /// Matches every event on entities of one type.
    EntityType(String),
    /// Matches events on exactly one entity.
    Entity(String, DbId),
}

impl TopicFilter {
    /// Parse a topic string.
    ///
    /// Accepts `"*"`, `"<type>"`, or `"<type>:<id>"`. Returns an error
    /// message for malformed input (empty segments, non-numeric id).
    pub fn parse(topic: &str) -> Result<Self, String> {
        if topic == "*" {
            return Ok(TopicFilter::All);
        }
        match topic.split_once(':') {
            None => {
                if topic.is_empty() {
                    Err("Topic must not be empty".to_string())
                } else {
                    Ok(TopicFilter::EntityType(topic.to_string()))
                }
            }
            Some((entity_type, id)) => {
                if entity_type.is_empty() {
                    return Err(format!("Topic '{topic}' has an empty entity type"));
                }
                let entity_id: DbId = id
                    .parse()
                    .map_err(|_| format!("Topic '{topic}' has a non-numeric entity id"))?;
                Ok(TopicFilter::Entity(entity_type.to_string(), entity_id))
            }
        }
    }

    /// Returns `true` if an event on the given entity matches this filter.
    pub fn matches(&self, entity_type: &str, entity_id: DbId) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::EntityType(t) => t == entity_type,
            TopicFilter::Entity(t, id) => t == entity_type && *id == entity_id,
        }
    }
}

/// Returns `true` if any filter in the set matches the given entity.
pub fn any_match(filters: &[TopicFilter], entity_type: &str, entity_id: DbId) -> bool {
    filters.iter().any(|f| f.matches(entity_type, entity_id))
}
