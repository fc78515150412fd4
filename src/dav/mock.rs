//! In-memory WebDAV store used by the test suites.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::sync::Semaphore;

use super::request::{DavMethod, DavRequest, DavResponse, RequestBody, Transport};
use crate::error::{DavError, Result};
use crate::fs::path::encode_path;

/// A request as seen by the store, with the mount stripped and paths decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub method: DavMethod,
    pub path: String,
    pub destination: Option<String>,
    pub depth: Option<String>,
    pub body_len: u64,
}

#[derive(Debug, Clone)]
pub(crate) enum Stub {
    Respond(u16, String),
    Disconnect,
}

#[derive(Default)]
struct State {
    /// Decoded path -> file contents; directories end in `/` and map to `None`.
    nodes: BTreeMap<String, Option<Bytes>>,
    log: Vec<Recorded>,
    stubs: HashMap<(DavMethod, String), Stub>,
}

pub(crate) struct MemoryDav {
    mount: String,
    state: Mutex<State>,
    gates: Mutex<HashMap<(DavMethod, String), Arc<Semaphore>>>,
}

impl MemoryDav {
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert("/".to_string(), None);
        Self {
            mount: "/dav".to_string(),
            state: Mutex::new(state),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.state.lock().unwrap().nodes.insert(path.to_string(), None);
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .nodes
            .insert(path.to_string(), Some(Bytes::from(contents.to_string())));
        self
    }

    /// Answer every `method` request on `path` with `stub` instead of the store.
    pub fn stub(&self, method: DavMethod, path: &str, stub: Stub) {
        self.state
            .lock()
            .unwrap()
            .stubs
            .insert((method, path.to_string()), stub);
    }

    /// Hold `method` requests on `path` until [`release`](Self::release) is called.
    pub fn gate(&self, method: DavMethod, path: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, method: DavMethod, path: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(&(method, path.to_string())) {
            gate.add_permits(1);
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn calls(&self) -> Vec<(DavMethod, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: DavMethod) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().unwrap().nodes.contains_key(path)
    }

    pub fn file(&self, path: &str) -> Option<Bytes> {
        self.state.lock().unwrap().nodes.get(path).cloned().flatten()
    }

    fn strip(&self, wire: &str) -> String {
        let wire = match wire.find("://") {
            Some(i) => {
                let rest = &wire[i + 3..];
                rest.find('/').map(|j| &rest[j..]).unwrap_or("/")
            }
            None => wire,
        };
        let local = wire.strip_prefix(self.mount.as_str()).unwrap_or(wire);
        let local = if local.is_empty() { "/" } else { local };
        urlencoding::decode(local)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| local.to_string())
    }

    fn multistatus(&self, nodes: &BTreeMap<String, Option<Bytes>>, path: &str) -> String {
        let mut body = String::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><d:multistatus xmlns:d=\"DAV:\">",
        );
        let mut push = |p: &str, contents: &Option<Bytes>| {
            let prop = match contents {
                None => "<d:resourcetype><d:collection/></d:resourcetype>".to_string(),
                Some(data) => format!(
                    "<d:resourcetype/><d:getcontentlength>{}</d:getcontentlength>",
                    data.len()
                ),
            };
            body.push_str(&format!(
                "<d:response><d:href>{}{}</d:href><d:propstat><d:prop>{}</d:prop>\
                 <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>",
                self.mount,
                encode_path(p),
                prop
            ));
        };

        if let Some(contents) = nodes.get(path) {
            push(path, contents);
        }
        if path.ends_with('/') {
            for (p, contents) in nodes.range(path.to_string()..) {
                if p == path {
                    continue;
                }
                let Some(rest) = p.strip_prefix(path) else { break };
                let rest = rest.trim_end_matches('/');
                if !rest.is_empty() && !rest.contains('/') {
                    push(p, contents);
                }
            }
        }
        body.push_str("</d:multistatus>");
        body
    }

    fn apply(&self, state: &mut State, rec: &Recorded, payload: Bytes) -> DavResponse {
        let path = rec.path.as_str();
        match rec.method {
            DavMethod::Propfind => {
                if state.nodes.contains_key(path) {
                    DavResponse::new(207, self.multistatus(&state.nodes, path))
                } else {
                    DavResponse::new(404, "Not Found")
                }
            }
            DavMethod::Get => match state.nodes.get(path) {
                Some(Some(data)) => DavResponse::new(200, data.clone()),
                Some(None) => DavResponse::new(405, "Is a collection"),
                None => DavResponse::new(404, "Not Found"),
            },
            DavMethod::Put => {
                if path.ends_with('/') {
                    return DavResponse::new(405, "Is a collection");
                }
                if !has_parent(&state.nodes, path) {
                    return DavResponse::new(409, "Parent collection missing");
                }
                state.nodes.insert(path.to_string(), Some(payload));
                DavResponse::new(201, "")
            }
            DavMethod::Delete => {
                if !state.nodes.contains_key(path) || path == "/" {
                    return DavResponse::new(404, "Not Found");
                }
                state
                    .nodes
                    .retain(|p, _| !(p == path || (path.ends_with('/') && p.starts_with(path))));
                DavResponse::new(204, "")
            }
            DavMethod::Move => {
                let Some(dest) = rec.destination.as_deref() else {
                    return DavResponse::new(400, "Missing Destination");
                };
                let Some(contents) = state.nodes.get(path).cloned() else {
                    return DavResponse::new(404, "Not Found");
                };
                if !has_parent(&state.nodes, dest) {
                    return DavResponse::new(409, "Parent collection missing");
                }
                state.nodes.remove(path);
                state.nodes.insert(dest.to_string(), contents);
                DavResponse::new(201, "")
            }
            DavMethod::Mkcol => {
                if state.nodes.contains_key(path) {
                    return DavResponse::new(405, "Already exists");
                }
                if !has_parent(&state.nodes, path) {
                    return DavResponse::new(409, "Parent collection missing");
                }
                state.nodes.insert(path.to_string(), None);
                DavResponse::new(201, "")
            }
        }
    }
}

fn parent_of(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.rfind('/').map(|i| &path[..=i])
}

fn has_parent(nodes: &BTreeMap<String, Option<Bytes>>, path: &str) -> bool {
    parent_of(path).is_some_and(|parent| matches!(nodes.get(parent), Some(None)))
}

#[async_trait]
impl Transport for MemoryDav {
    async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        let mut payload = BytesMut::new();
        match request.body {
            RequestBody::Empty => {}
            RequestBody::Text(ref t) => payload.extend_from_slice(t.as_bytes()),
            RequestBody::Stream { mut chunks, .. } => {
                while let Some(chunk) = chunks.next().await {
                    payload.extend_from_slice(&chunk?);
                    tokio::task::yield_now().await;
                }
            }
        }

        let rec = Recorded {
            method: request.method,
            path: self.strip(&request.path),
            destination: request
                .headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case("Destination"))
                .map(|(_, v)| self.strip(v)),
            depth: request
                .headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case("Depth"))
                .map(|(_, v)| v.clone()),
            body_len: payload.len() as u64,
        };

        let gate = self
            .gates
            .lock()
            .unwrap()
            .get(&(rec.method, rec.path.clone()))
            .cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        let mut state = self.state.lock().unwrap();
        state.log.push(rec.clone());
        if let Some(stub) = state.stubs.get(&(rec.method, rec.path.clone())).cloned() {
            return match stub {
                Stub::Respond(status, body) => Ok(DavResponse::new(status, body)),
                Stub::Disconnect => Err(DavError::Network("connection reset".to_string())),
            };
        }
        Ok(self.apply(&mut state, &rec, payload.freeze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dav::multistatus::parse_listing;

    #[tokio::test]
    async fn test_listing_shape() {
        let dav = MemoryDav::new()
            .with_dir("/docs/")
            .with_file("/docs/a b.txt", "hello")
            .with_dir("/docs/sub/")
            .with_file("/docs/sub/deep.txt", "x");
        let resp = dav
            .execute(DavRequest::new(DavMethod::Propfind, "/dav/docs/"))
            .await
            .unwrap();
        assert_eq!(resp.status, 207);
        let entries = parse_listing(&resp.text()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a b.txt", "sub"]);
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/a/b.txt"), Some("/a/"));
        assert_eq!(parent_of("/a/b/"), Some("/a/"));
        assert_eq!(parent_of("/a"), Some("/"));
        assert_eq!(parent_of("/"), None);
    }
}
