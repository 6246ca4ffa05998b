// Prompt construction for round and consolidation calls.
//
// The round prompt embeds the entire current registry as `label: id` lines —
// that enumeration is the only knowledge the model has of what already
// exists, so every round's prompt reflects the state left by the previous
// round. To keep the prompt inside the model's context window the listing is
// capped: past MAX_ENUMERATED_TOPICS entries only a count of the overflow is
// shown.

use crate::llm::traits::ChatMessage;

use super::registry::TopicRegistry;

/// Cap on the number of registry entries enumerated in a round prompt.
/// Runs that somehow exceed this keep working; the model just stops seeing
/// the oldest topics and may re-propose near-duplicates.
pub const MAX_ENUMERATED_TOPICS: usize = 200;

/// Build the two-message conversation for one extraction round.
pub fn round_messages(
    registry: &TopicRegistry,
    round: usize,
    total_rounds: usize,
    batch: &[String],
) -> Vec<ChatMessage> {
    let system = format!(
        "You are an AI assistant tasked with identifying topics from a collection of tweets.\n\
         These tweets are short tweets from Twitter users, which may include various forms of\n\
         content such as news, opinions, discussions, events, especially war-events and\n\
         sometimes spam or irrelevant information. Your job is to analyze the tweets and\n\
         generate a list of coherent topics that represent the main subjects discussed.\n\
         If a topic that represents the main subjects discussed already exists, don't add it\n\
         again. Focus on identifying meaningful and relevant topics while ignoring spam or\n\
         unrelated content. Be careful not to add topics that are similar to the ones\n\
         already listed.\n\
         \n\
         You are currently processing batch {} of {}.\n\
         \n\
         When providing your response, you should categorize your decisions into two types:\n\
         - add: When you identify a new topic not related to any existing topic (no ID needed).\n\
         - remove: When a topic is no longer relevant or needs to be deleted because you\n\
           added a more refined one (provide the topic ID).\n\
         \n\
         You have to respond in JSON format and in Hebrew language.\n\
         \n\
         Here are the current topics with their IDs:\n\
         {}\n\
         {}",
        round + 1,
        total_rounds,
        enumerate_topics(registry),
        EXAMPLE_ROUND_RESPONSE,
    );

    let user = format!(
        "Here is a batch of tweets:\n{}\n\n\
         Generate a list of topics from these tweets and specify your actions for each\n\
         topic. Make sure to avoid adding duplicate or similar topics to the existing list:\n",
        batch.concat(),
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Build the two-message conversation for the terminal consolidation call.
///
/// The user message carries the surviving labels one per line, in discovery
/// order. The abbreviation-expansion rule (בג → בגץ) comes verbatim from the
/// original instructions — domain-specific text normalization for the
/// Hebrew corpus this pipeline targets.
pub fn consolidation_messages(registry: &TopicRegistry, target_count: usize) -> Vec<ChatMessage> {
    let system = format!(
        "You are a helpful assistant. The user will provide you a list of topics. Each topic\n\
         is in a new line. Your task is to provide a JSON of {target_count} topics that\n\
         represents well all of the topics. Make sure the subjects are logical and distinct\n\
         from one another to avoid duplication and ensure variety.\n\
         \n\
         Whenever encountering abbreviated words, replace them with their full forms. For\n\
         instance, the abbreviation בג should be replaced with בגץ. This rule should be\n\
         applied universally to similar abbreviations.\n\
         \n\
         Examples:\n\
         בג -> בגץ\n\
         \"ביקורת על בג\" should be \"ביקורת על בגץ\"\n\
         \"ההשלכות של החלטות בג\" should be \"ההשלכות של החלטות בגץ\"\n\
         \"הפגנות נגד בג\" should be \"הפגנות נגד בגץ\"\n\
         \n\
         You must response the topics names in Hebrew\n\
         \n\
         Example JSON response:\n\
         {{\n\
             \"response\": [\n\
                 \"topic num 1\",\n\
                 \"topic num 2\",\n\
                 ...\n\
                 \"topic num {target_count}\"\n\
             ]\n\
         }}",
    );

    let user = registry.labels().join("\n");

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Enumerate registry entries as `label: id` lines, capped.
fn enumerate_topics(registry: &TopicRegistry) -> String {
    let entries = registry.entries();
    let mut listing: Vec<String> = entries
        .iter()
        .take(MAX_ENUMERATED_TOPICS)
        .map(|(label, id)| format!("{label}: {id}"))
        .collect();

    if entries.len() > MAX_ENUMERATED_TOPICS {
        listing.push(format!(
            "(and {} more topics not listed)",
            entries.len() - MAX_ENUMERATED_TOPICS
        ));
    }

    listing.join("\n")
}

const EXAMPLE_ROUND_RESPONSE: &str = r#"
Example JSON response:
{
    "add": [
        "Judicial Reform in Israel",
        "Public Sentiment on Military Actions",
        "Humanitarian Issues in Gaza",
        "Public Protests Against Government Policies",
        "Media Coverage of War Events"
    ],
    "remove": [
        {"topic": "Judicial Decisions and Implications", "id": 12},
        {"topic": "War and Conflict in Gaza", "id": 9}
    ]
}
Make sure you not only adding new topics! You must response the topics names in Hebrew"#;
