use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

#[test]
fn mcp_stdio_smoke() {
    // `cargo test` sets this for integration tests.
    let bin = env!("CARGO_BIN_EXE_ccglm-mcp");

    let mut child = Command::new(bin)
        .arg("mcp")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ccglm-mcp mcp");

    {
        let stdin = child.stdin.as_mut().expect("child stdin");

        // Keep each JSON-RPC message on one line (server reads by lines()).
        writeln!(
            stdin,
            "{}",
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": { "protocolVersion": "2024-11-05" }
            })
        )
        .unwrap();

        writeln!(
            stdin,
            "{}",
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/list"
            })
        )
        .unwrap();

        // No prompt — must fail fast without touching network or filesystem.
        writeln!(
            stdin,
            "{}",
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": { "name": "ccglm", "arguments": {} }
            })
        )
        .unwrap();

        // Unknown tools are reported inside the result envelope, not as a
        // JSON-RPC error.
        writeln!(
            stdin,
            "{}",
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": { "name": "nonexistent", "arguments": {} }
            })
        )
        .unwrap();
    }

    // Close stdin so the server loop can exit.
    drop(child.stdin.take());

    let stdout = child.stdout.take().expect("child stdout");
    let reader = BufReader::new(stdout);

    let mut replies_by_id: HashMap<i64, serde_json::Value> = HashMap::new();

    for line in reader.lines() {
        let line = line.expect("read stdout line");
        if line.trim().is_empty() {
            continue;
        }
        let v: serde_json::Value = serde_json::from_str(&line).expect("stdout is json");
        let id = v
            .get("id")
            .and_then(|x| x.as_i64())
            .expect("json-rpc response id");
        replies_by_id.insert(id, v);
        if replies_by_id.len() >= 4 {
            break;
        }
    }

    let status = child.wait().expect("wait child");
    assert!(status.success(), "mcp process should exit cleanly");

    // initialize
    {
        let v = replies_by_id.get(&1).expect("initialize reply");
        assert_eq!(v.get("jsonrpc").and_then(|x| x.as_str()), Some("2.0"));
        let result = v.get("result").expect("initialize result");
        assert!(result.get("capabilities").is_some());
        assert_eq!(
            result
                .get("serverInfo")
                .and_then(|s| s.get("name"))
                .and_then(|n| n.as_str()),
            Some("ccglm-mcp")
        );
    }

    // tools/list: exactly one tool, with the documented schema.
    {
        let v = replies_by_id.get(&2).expect("tools/list reply");
        let tools = v
            .get("result")
            .and_then(|r| r.get("tools"))
            .and_then(|t| t.as_array())
            .expect("tools array");
        assert_eq!(tools.len(), 1, "exactly one tool must be listed");

        let tool = &tools[0];
        assert_eq!(tool.get("name").and_then(|n| n.as_str()), Some("ccglm"));

        let schema = tool.get("inputSchema").expect("input schema");
        let required: Vec<&str> = schema
            .get("required")
            .and_then(|r| r.as_array())
            .expect("required array")
            .iter()
            .filter_map(|x| x.as_str())
            .collect();
        assert_eq!(required, vec!["prompt"]);

        let model_enum = schema
            .pointer("/properties/model/enum")
            .and_then(|e| e.as_array())
            .expect("model enum");
        let names: Vec<&str> = model_enum.iter().filter_map(|x| x.as_str()).collect();
        assert!(names.contains(&"glm-4.7"), "enum: {names:?}");
        assert!(names.contains(&"glm-4.5-air"), "enum: {names:?}");
    }

    // tools/call without a prompt
    {
        let v = replies_by_id.get(&3).expect("missing-prompt reply");
        let result = v.get("result").expect("tools/call result");
        assert_eq!(result.get("isError").and_then(|x| x.as_bool()), Some(true));
        let text = result
            .pointer("/content/0/text")
            .and_then(|x| x.as_str())
            .expect("error text");
        assert!(text.contains("Missing prompt"), "text: {text}");
    }

    // tools/call with an unknown tool name
    {
        let v = replies_by_id.get(&4).expect("unknown-tool reply");
        let result = v.get("result").expect("tools/call result");
        assert_eq!(result.get("isError").and_then(|x| x.as_bool()), Some(true));
        let text = result
            .pointer("/content/0/text")
            .and_then(|x| x.as_str())
            .expect("error text");
        assert!(text.contains("Tool not found"), "text: {text}");
    }
}
