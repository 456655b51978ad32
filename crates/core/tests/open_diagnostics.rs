// Diagnostics emitted by misuse of the session handle.

use std::io;
use std::sync::{Arc, Mutex};

use beam_link::{FakeDocumentBuilder, LinkOptions, LinkSession};
use tracing::Level;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
	fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for CapturedLogs {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

fn capture<F: FnOnce()>(f: F) -> String {
	let logs = CapturedLogs::default();
	let writer = logs.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_writer(move || writer.clone())
		.with_ansi(false)
		.with_max_level(Level::DEBUG)
		.finish();
	tracing::subscriber::with_default(subscriber, f);
	logs.contents()
}

#[test]
fn open_without_token_warns() {
	let (document, controller) = FakeDocumentBuilder::new().build();
	let session = LinkSession::new(document, LinkOptions::default(), |_| {}, || {});

	let output = capture(|| session.open());

	assert!(output.contains("WARN"), "no warning in: {output}");
	assert!(output.contains("without a valid link token"), "unexpected output: {output}");
	assert!(controller.modals().is_empty());
}

#[test]
fn open_with_token_does_not_warn() {
	let (document, _controller) = FakeDocumentBuilder::new().build();
	let session = LinkSession::new(document, LinkOptions::default().with_link_token("abc"), |_| {}, || {});

	let output = capture(|| session.open());

	assert!(!output.contains("WARN"), "unexpected warning: {output}");
	assert!(output.contains("modal visibility"));
	assert!(session.visible());
}

#[test]
fn mount_failure_is_logged() {
	let (document, controller) = FakeDocumentBuilder::new().build();
	let session = LinkSession::new(document, LinkOptions::default(), |_| {}, || {});
	controller.fail_next_insert("document has no body");

	let output = capture(|| {
		let _ = session.set_link_token(Some("abc"));
	});

	assert!(output.contains("failed to mount link session"), "unexpected output: {output}");
	assert!(output.contains("document has no body"));
}
