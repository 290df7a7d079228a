use test_utils::codeblock_fixture;

use super::Message;
use super::MessageType;
use super::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::Assistant, "Hi there!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
    assert_eq!(msg.content, "Hi there!".to_string());
    assert_eq!(msg.mtype, MessageType::Normal);
    assert!(!msg.is_error());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(Role::User, "\t\tHi there!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "    Hi there!".to_string());
}

#[test]
fn it_executes_new_with_type() {
    let msg = Message::new_with_type(Role::Assistant, MessageType::Error, "It broke!");
    assert_eq!(msg.content, "It broke!".to_string());
    assert_eq!(msg.message_type(), MessageType::Error);
    assert!(msg.is_error());
}

#[test]
fn it_assigns_unique_ids() {
    let first = Message::new(Role::User, "one");
    let second = Message::new(Role::User, "one");
    assert_ne!(first.id, second.id);
    assert!(second.timestamp >= first.timestamp);
}

#[test]
fn it_executes_codeblocks() {
    let msg = Message::new(Role::Assistant, codeblock_fixture());
    let codeblocks = msg.codeblocks();

    assert_eq!(codeblocks.len(), 4);
    assert_eq!(codeblocks[0].language, "rust");
    insta::assert_snapshot!(codeblocks[0].code, @r###"
    fn print_numbers() {
        for i in 0..=0 {
            println!("{i}");
        }
    }
    "###);

    assert_eq!(codeblocks[1].language, "java");
    insta::assert_snapshot!(codeblocks[1].code, @r###"
    public class Main {
        public static void main(String[] args) {
            System.out.println("Hello, Java!");
        }
    }
    "###);

    assert_eq!(codeblocks[2].language, "");
    insta::assert_snapshot!(codeblocks[2].code, @"abc123");

    assert_eq!(codeblocks[3].language, "python");
    insta::assert_snapshot!(codeblocks[3].code, @r###"
    for i in range(11):
        print(i)
    "###);
}

#[test]
fn it_returns_no_codeblocks_for_plain_text() {
    let msg = Message::new(Role::Assistant, "No code here.");
    assert!(msg.codeblocks().is_empty());
}
