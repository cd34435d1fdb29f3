use super::*;
use crate::core::chat_request::ChatReply;
use crate::core::controller::RequestKind;
use crate::core::message::Message;
use crate::utils::test_utils::create_test_controller;

fn notice(result: CommandResult) -> String {
    match result {
        CommandResult::Notice(text) => text,
        _ => panic!("expected a notice"),
    }
}

#[test]
fn plain_text_is_processed_as_message() {
    let mut controller = create_test_controller();
    let result = process_input(&mut controller, "hello there");
    assert!(matches!(result, CommandResult::ProcessAsMessage(text) if text == "hello there"));
}

#[test]
fn unknown_commands_fall_through_to_the_model() {
    let mut controller = create_test_controller();
    let result = process_input(&mut controller, "/shrug at this");
    assert!(matches!(result, CommandResult::ProcessAsMessage(text) if text == "/shrug at this"));

    let result = process_input(&mut controller, "/");
    assert!(matches!(result, CommandResult::ProcessAsMessage(_)));
}

#[test]
fn command_names_are_case_insensitive() {
    let mut controller = create_test_controller();
    assert!(matches!(
        process_input(&mut controller, "/QUIT"),
        CommandResult::Quit
    ));
    assert!(matches!(
        process_input(&mut controller, "  /exit  "),
        CommandResult::Quit
    ));
}

#[test]
fn help_lists_every_command() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/help"));
    for command in all_commands() {
        assert!(text.contains(command.usage), "missing {}", command.usage);
    }
}

#[test]
fn clear_command_resets_transcript_state() {
    let mut controller = create_test_controller();
    let pending = controller.send_message("Hello").expect("pending");

    let text = notice(process_input(&mut controller, "/clear"));
    assert_eq!(text, "Transcript cleared");
    assert!(controller.messages().is_empty());
    assert!(!controller.is_loading());
    assert!(pending.cancel_token.is_cancelled());
}

#[test]
fn system_command_adds_local_instruction() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/system Answer in French."));
    assert_eq!(text, "System instruction added");
    assert_eq!(controller.messages(), &[Message::system("Answer in French.")]);

    let text = notice(process_input(&mut controller, "/system   "));
    assert!(text.starts_with("Usage"));
    assert_eq!(controller.messages().len(), 1);
}

#[test]
fn summarize_needs_a_conversation() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/summarize"));
    assert_eq!(text, "Nothing to summarize yet.");
}

#[test]
fn summarize_dispatches_summary_request() {
    let mut controller = create_test_controller();
    let pending = controller.send_message("hi").expect("pending");
    assert!(controller.complete_request(pending.id, Ok(ChatReply::new("hello"))));

    match process_input(&mut controller, "/summarize") {
        CommandResult::Dispatch(pending) => assert_eq!(pending.kind, RequestKind::Summary),
        _ => panic!("expected a summary dispatch"),
    }
}

#[test]
fn summarize_while_busy_is_refused() {
    let mut controller = create_test_controller();
    let _pending = controller.send_message("hi").expect("pending");
    let text = notice(process_input(&mut controller, "/summarize"));
    assert!(text.contains("Still waiting"));
    assert_eq!(controller.messages().len(), 1);
}

#[test]
fn book_restarts_with_opener() {
    let mut controller = create_test_controller();
    controller.send_system_prompt_message("old");
    match process_input(&mut controller, "/book") {
        CommandResult::Dispatch(pending) => assert_eq!(pending.kind, RequestKind::Turn),
        _ => panic!("expected a dispatch"),
    }
    assert_eq!(controller.messages().len(), 1);
    assert!(controller.messages()[0].is_user());
}

#[test]
fn mode_command_shows_and_sets() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/mode"));
    assert!(text.starts_with("Mode: none"));

    let text = notice(process_input(&mut controller, "/mode JSON"));
    assert_eq!(text, "Mode set: json");
    assert_eq!(controller.mode(), Mode::Json);

    let text = notice(process_input(&mut controller, "/mode poetry"));
    assert!(text.contains("unknown mode"));
    assert_eq!(controller.mode(), Mode::Json);
}

#[test]
fn model_command_lists_and_switches() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/model"));
    assert!(text.contains("* gemini-2.0-flash"));
    assert!(text.contains("deepseek-v3.2"));

    let text = notice(process_input(&mut controller, "/model gpt-4o-mini"));
    assert_eq!(text, "Model set: gpt-4o-mini");
    assert_eq!(controller.model(), ModelId::Gpt4oMini);
    assert_eq!(controller.credentials().api_key, "key-gpt-4o-mini");

    let text = notice(process_input(&mut controller, "/model gpt-5"));
    assert!(text.contains("unknown model"));
    assert_eq!(controller.model(), ModelId::Gpt4oMini);
}

#[test]
fn temperature_command_parses_numbers() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/temperature"));
    assert_eq!(text, "Temperature: 0.7");

    let text = notice(process_input(&mut controller, "/temperature 1.5"));
    assert_eq!(text, "Temperature set: 1.5");
    assert_eq!(controller.temperature(), 1.5);

    let text = notice(process_input(&mut controller, "/temperature hot"));
    assert!(text.starts_with("Invalid temperature"));
    assert_eq!(controller.temperature(), 1.5);
}

#[test]
fn history_renders_transcript() {
    let mut controller = create_test_controller();
    let text = notice(process_input(&mut controller, "/history"));
    assert_eq!(text, "The conversation is empty.");

    controller.send_system_prompt_message("Be brief.");
    let pending = controller.send_message("hi").expect("pending");
    assert!(controller.complete_request(pending.id, Ok(ChatReply::new("hello"))));

    let text = notice(process_input(&mut controller, "/history"));
    assert!(text.contains("System: Be brief."));
    assert!(text.contains("You: hi"));
    assert!(text.contains("Assistant: hello"));
}
