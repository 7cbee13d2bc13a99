use serde_json::Value;

/// Decodes HTML entities in every string reachable from `value`. The trivia
/// API escapes quotes, ampersands and the like (`&quot;`, `&#039;`, ...), so
/// the whole payload gets decoded before it is deserialized any further.
///
/// Decoding is best-effort: sequences `html_escape` doesn't recognize pass
/// through unchanged, and non-string values are returned as-is.
pub fn decode_entities(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(html_escape::decode_html_entities(&s).into_owned()),
        Value::Array(items) => Value::Array(items.into_iter().map(decode_entities).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, inner)| (key, decode_entities(inner)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_plain_strings() {
        let decoded = decode_entities(json!("&quot;Hello&quot; &amp; it&#039;s fine"));
        assert_eq!(decoded, json!("\"Hello\" & it's fine"));
    }

    #[test]
    fn decodes_strings_nested_in_objects_and_arrays() {
        let payload = json!({
            "results": [{
                "question": "Who wrote &quot;Dune&quot;?",
                "correct_answer": "Frank Herbert",
                "incorrect_answers": ["Isaac Asimov", "Arthur C. Clarke &amp; co"]
            }]
        });
        let decoded = decode_entities(payload);
        assert_eq!(
            decoded,
            json!({
                "results": [{
                    "question": "Who wrote \"Dune\"?",
                    "correct_answer": "Frank Herbert",
                    "incorrect_answers": ["Isaac Asimov", "Arthur C. Clarke & co"]
                }]
            })
        );
    }

    #[test]
    fn leaves_non_strings_alone() {
        let payload = json!({"response_code": 0, "ok": true, "nothing": null});
        assert_eq!(decode_entities(payload.clone()), payload);
    }

    #[test]
    fn no_escapes_remain_and_decoding_is_idempotent() {
        let payload = json!(["It&#039;s", {"q": "A &amp; B"}, "&quot;quoted&quot;"]);
        let once = decode_entities(payload);

        let as_text = serde_json::to_string(&once).unwrap();
        assert!(!as_text.contains("&quot;"));
        assert!(!as_text.contains("&#039;"));
        assert!(!as_text.contains("&amp;"));

        let twice = decode_entities(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn unknown_sequences_pass_through() {
        let decoded = decode_entities(json!("50&zzz; 50"));
        assert_eq!(decoded, json!("50&zzz; 50"));
    }
}
