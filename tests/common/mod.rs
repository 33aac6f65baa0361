//! A minimal HTTP/1.1 server standing in for the Email Verification API.

use email_verifier::Client;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::Url;

pub const API_KEY: &str = "at_LoremIpsumDolorSitAmetConsect";
pub const EMAIL: &str = "support@whoisxmlapi.com";

pub const OK_BODY: &str = r#"{"username":"support","domain":"whoisxmlapi.com","emailAddress":"support@whoisxmlapi.com",
"formatCheck":"true","smtpCheck":"true","dnsCheck":"true","freeCheck":"false","disposableCheck":"false",
"catchAllCheck":"true","mxRecords":["alt1.aspmx.l.google.com.","aspmx2.googlemail.com.","aspmx.l.google.com.",
"aspmx3.googlemail.com.","alt2.aspmx.l.google.com."],"audit":{"auditCreatedDate":"2022-04-03 05:02:37 UTC",
"auditUpdatedDate":"2022-04-03 05:02:37 UTC"}}"#;

pub const UNPARSABLE_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?><>"#;

pub const ERROR_BODY: &str = r#"{"ErrorMessage":{"Error":"test error message"}}"#;

pub const PATH_OK: &str = "/evapi/ok";
pub const PATH_ERROR: &str = "/evapi/error";
pub const PATH_ENVELOPE: &str = "/evapi/envelope";
pub const PATH_500: &str = "/evapi/500";
pub const PATH_PARTIAL: &str = "/evapi/partial";
pub const PATH_SHORT_BODY: &str = "/evapi/short-body";
pub const PATH_UNPARSABLE: &str = "/evapi/unparsable";

struct Reply {
    status: &'static str,
    body: String,
    declared_length: usize,
}

impl Reply {
    fn new(status: &'static str, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            declared_length: body.len(),
        }
    }
}

fn route(path: &str) -> Reply {
    match path {
        PATH_OK => Reply::new("200 OK", OK_BODY),
        PATH_ERROR => Reply::new("400 Bad Request", ERROR_BODY),
        PATH_ENVELOPE => Reply::new("200 OK", ERROR_BODY),
        PATH_500 => Reply::new("500 Internal Server Error", UNPARSABLE_BODY),
        PATH_PARTIAL => Reply::new("200 OK", &OK_BODY[..OK_BODY.len() - 10]),
        PATH_SHORT_BODY => Reply {
            declared_length: OK_BODY.len(),
            ..Reply::new("200 OK", &OK_BODY[..OK_BODY.len() - 10])
        },
        PATH_UNPARSABLE => Reply::new("200 OK", UNPARSABLE_BODY),
        other => Reply::new("404 Not Found", &format!("no route for {other}")),
    }
}

/// A running server. Every request head it receives is forwarded to `requests`.
pub struct TestServer {
    pub url: Url,
    pub requests: mpsc::UnboundedReceiver<String>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, tx).await;
                });
            }
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            requests: rx,
        }
    }

    /// A client whose base URL points at `path` on this server.
    pub fn client(&self, path: &str) -> Client {
        Client::builder(API_KEY)
            .base_url(self.url.join(path).unwrap())
            .build()
    }

    /// The next request head received, as text.
    pub async fn next_request(&mut self) -> String {
        self.requests.recv().await.unwrap()
    }
}

async fn serve(stream: TcpStream, tx: mpsc::UnboundedSender<String>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }

    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let path = target.split('?').next().unwrap_or("/").to_string();
    let _ = tx.send(head);

    let reply = route(&path);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status, reply.declared_length, reply.body
    );

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await
}
