use serde_json::json;

pub fn codeblock_fixture() -> &'static str {
    return r#"
Here's how to print in Rust.

```rust
fn print_numbers() {
    for i in 0..=0 {
        println!("{i}");
    }
}
```

And in Java.

```java
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello, Java!");
    }
}
```

This is a markdown codeblock that has no language. We count it as well incase an LLM doesn't attach a language.

```
abc123
```

Let's do Python as well!

```python
for i in range(11):
    print(i)
```

That's it!
"#
    .trim();
}

/// A `generateContent` response body whose first candidate carries `parts`.
pub fn gemini_response_fixture(parts: &[&str]) -> String {
    let parts = parts
        .iter()
        .map(|text| return json!({ "text": text }))
        .collect::<Vec<_>>();

    return json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 30 }
    })
    .to_string();
}

/// A Gemini error envelope as returned with non-2xx statuses.
pub fn gemini_error_fixture(code: u16, status: &str, message: &str) -> String {
    return json!({
        "error": { "code": code, "message": message, "status": status }
    })
    .to_string();
}
