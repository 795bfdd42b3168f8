use std::sync::{Arc, Mutex};

use parallel_rc::output::Logger;

fn capture() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
    let out = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let out = Arc::clone(&out);
        move |text: String| out.lock().unwrap().push(text)
    };
    (out, sink)
}

#[test]
fn complete_lines_are_prefixed_and_decorated_immediately() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink)
        .prefix("3: ")
        .decorate(|line| format!("<{line}>"));

    logger.write("one\ntwo\npart");

    assert_eq!(
        *out.lock().unwrap(),
        vec!["3: <one>\n".to_string(), "3: <two>\n".to_string()]
    );
}

#[test]
fn partial_line_waits_for_its_newline() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink);

    logger.write("ab");
    logger.write("c");
    assert!(out.lock().unwrap().is_empty());

    logger.write("\n");
    assert_eq!(*out.lock().unwrap(), vec!["abc\n".to_string()]);
}

#[test]
fn crlf_input_is_split_like_lf() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink);

    logger.write("a\r\nb\r\n");
    assert_eq!(*out.lock().unwrap(), vec!["a\n".to_string(), "b\n".to_string()]);
}

#[test]
fn log_always_flushes() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink).prefix("0: ");

    logger.log("$ echo hi");
    assert_eq!(*out.lock().unwrap(), vec!["0: $ echo hi\n".to_string()]);
}

#[test]
fn second_flush_is_a_no_op() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink);

    logger.write("tail");
    logger.flush();
    logger.flush();

    assert_eq!(*out.lock().unwrap(), vec!["tail\n".to_string()]);
}

#[test]
fn flush_with_empty_buffer_emits_nothing() {
    let (out, sink) = capture();
    let mut logger = Logger::new(sink);

    logger.write("done\n");
    logger.flush();

    assert_eq!(*out.lock().unwrap(), vec!["done\n".to_string()]);
}

#[test]
fn loggers_do_not_share_buffers() {
    let (out, sink_a) = capture();
    let sink_b = {
        let out = Arc::clone(&out);
        move |text: String| out.lock().unwrap().push(text)
    };
    let mut a = Logger::new(sink_a).prefix("0: ");
    let mut b = Logger::new(sink_b).prefix("1: ");

    a.write("from-a ");
    b.write("from-b\n");
    a.write("again\n");

    assert_eq!(
        *out.lock().unwrap(),
        vec!["1: from-b\n".to_string(), "0: from-a again\n".to_string()]
    );
}
