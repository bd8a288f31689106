mod common;

use serde_json::json;

use campus_engine::assistant::{Conversation, MODEL_ERROR_REPLY};
use campus_engine::Message;
use common::{assistant, RecordingResources, ScriptedModel};

#[tokio::test]
async fn plain_answer_is_recorded_verbatim() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply("Hi! I can help with schools, rooms and sensors.");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "hello")
        .await
        .unwrap();

    assert_eq!(reply, "Hi! I can help with schools, rooms and sensors.");
    assert_eq!(
        conversation.history(),
        &[
            Message::user("hello"),
            Message::assistant("Hi! I can help with schools, rooms and sensors."),
        ]
    );
    assert!(resources.calls().is_empty());
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn directive_fetches_data_and_formats_it() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": "schools", "params": {}}"#);
    model.reply("| School |\n|---|\n| North High |");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "Show me all schools")
        .await
        .unwrap();

    assert_eq!(reply, "| School |\n|---|\n| North High |");
    assert_eq!(resources.calls(), vec!["schools"]);

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].system.contains("The user asked: \"Show me all schools\""));
    assert!(requests[1].system.contains("\"name\": \"North High\""));
    assert_eq!(requests[1].messages, vec![Message::user("Show me all schools")]);

    // Only the formatted answer is stored, never the directive
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.history()[1], Message::assistant(reply));
}

#[tokio::test]
async fn directive_ids_are_forwarded() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": "values", "params": {"sensor_uuid": "t-1"}}"#);
    model.reply("It is 21.5 °C.");

    let mut conversation = Conversation::new();
    assistant(&model, &resources)
        .process_message(&mut conversation, "How warm is sensor t-1?")
        .await
        .unwrap();

    assert_eq!(resources.calls(), vec!["values:t-1"]);
}

#[tokio::test]
async fn missing_school_id_short_circuits_rooms_fetch() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": "rooms", "params": {}}"#);
    model.reply("Which school do you mean?");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "List the rooms")
        .await
        .unwrap();

    assert_eq!(reply, "Which school do you mean?");
    assert!(resources.calls().is_empty());

    let expected = serde_json::to_string_pretty(
        &json!({"error": "School UUID required for fetching rooms"}),
    )
    .unwrap();
    assert!(model.requests()[1].system.contains(&expected));
}

#[tokio::test]
async fn missing_room_and_sensor_ids_short_circuit_fetches() {
    let cases = [
        (
            r#"{"needsAPI": true, "apiType": "sensors", "params": {"school_uuid": "s-1"}}"#,
            "Room UUID required for fetching sensors",
        ),
        (
            r#"{"needsAPI": true, "apiType": "values", "params": {"sensor_uuid": "  "}}"#,
            "Sensor UUID required for fetching values",
        ),
    ];

    for (directive, error) in cases {
        let model = ScriptedModel::new();
        let resources = RecordingResources::new();
        model.reply(directive);
        model.reply("Which one do you mean?");

        let mut conversation = Conversation::new();
        let reply = assistant(&model, &resources)
            .process_message(&mut conversation, "Show me the readings")
            .await
            .unwrap();

        assert_eq!(reply, "Which one do you mean?");
        assert!(resources.calls().is_empty(), "{} reached the API", error);

        let expected = serde_json::to_string_pretty(&json!({ "error": error })).unwrap();
        assert!(model.requests()[1].system.contains(&expected));
    }
}

#[tokio::test]
async fn non_string_api_type_is_reported_to_the_model() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": 4}"#);
    model.reply("I can't look that up.");

    let mut conversation = Conversation::new();
    assistant(&model, &resources)
        .process_message(&mut conversation, "Look up 4")
        .await
        .unwrap();

    assert!(resources.calls().is_empty());
    assert!(model.requests()[1].system.contains("Unknown API type: 4"));
}

#[tokio::test]
async fn unknown_api_type_is_reported_to_the_model() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": "buildings"}"#);
    model.reply("I can't look up buildings.");

    let mut conversation = Conversation::new();
    assistant(&model, &resources)
        .process_message(&mut conversation, "List buildings")
        .await
        .unwrap();

    assert!(resources.calls().is_empty());
    assert!(model.requests()[1].system.contains("Unknown API type: buildings"));
}

#[tokio::test]
async fn fetch_failures_become_error_data() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::failing("resource API returned 503");
    model.reply(r#"{"needsAPI": true, "apiType": "sensors", "params": {"room_uuid": "r-1"}}"#);
    model.reply("The sensor service is unavailable right now.");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "Sensors in r-1?")
        .await
        .unwrap();

    assert_eq!(reply, "The sensor service is unavailable right now.");
    assert_eq!(resources.calls(), vec!["sensors:r-1"]);
    assert!(model.requests()[1]
        .system
        .contains("Failed to fetch sensors: resource API returned 503"));
}

#[tokio::test]
async fn model_failure_yields_fixed_reply() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.fail("connection reset");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "hello")
        .await
        .unwrap();

    assert_eq!(reply, MODEL_ERROR_REPLY);
    assert_eq!(conversation.history()[1], Message::assistant(MODEL_ERROR_REPLY));
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn formatting_failure_yields_fixed_reply() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    model.reply(r#"{"needsAPI": true, "apiType": "schools"}"#);
    model.fail("overloaded");

    let mut conversation = Conversation::new();
    let reply = assistant(&model, &resources)
        .process_message(&mut conversation, "schools?")
        .await
        .unwrap();

    assert_eq!(reply, MODEL_ERROR_REPLY);
    assert_eq!(conversation.len(), 2);
}

#[tokio::test]
async fn context_window_is_capped_but_history_is_not() {
    let model = ScriptedModel::new();
    let resources = RecordingResources::new();
    for i in 0..4 {
        model.reply(format!("answer {}", i));
    }

    let assistant = assistant(&model, &resources);
    let mut conversation = Conversation::new();
    for i in 0..4 {
        assistant
            .process_message(&mut conversation, &format!("question {}", i))
            .await
            .unwrap();
    }

    assert_eq!(conversation.len(), 8);

    let last = model.requests().pop().unwrap();
    assert_eq!(
        last.messages,
        vec![
            Message::user("question 1"),
            Message::assistant("answer 1"),
            Message::user("question 2"),
            Message::assistant("answer 2"),
            Message::user("question 3"),
        ]
    );
}
