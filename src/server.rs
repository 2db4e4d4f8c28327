// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

pub mod reply;
pub mod router;

use std::{io::Read, sync::Arc, thread};

use eyre::eyre;
use tiny_http::{Request, Server};

use crate::{config::server::Server as ServerConfig, convert::Converter, store::RuleStore};
use reply::Reply;

/// Everything a worker needs to answer a request.
pub struct App {
    pub converter: Converter,
    pub store: Arc<dyn RuleStore>,
    pub max_body_bytes: usize,
    pub log_requests: bool,
}

impl App {
    pub fn new(converter: Converter, store: Arc<dyn RuleStore>, config: &ServerConfig) -> Self {
        Self {
            converter,
            store,
            max_body_bytes: config.max_body_bytes,
            log_requests: config.log_requests,
        }
    }
}

/// Listen on `address` and answer requests from `workers` threads until the
/// listener shuts down.
pub fn serve(app: App, address: &str, workers: usize) -> eyre::Result<()> {
    let server = Server::http(address).map_err(|err| eyre!("failed to bind {}: {}", address, err))?;
    let server = Arc::new(server);
    let app = Arc::new(app);

    color_print::cprintln!("<g>[serve]</> Listening on http://{}", address);

    let handles: Vec<_> = (0..workers.max(1))
        .map(|_| {
            let server = Arc::clone(&server);
            let app = Arc::clone(&app);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle(&app, request);
                }
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| eyre!("a server worker panicked"))?;
    }
    Ok(())
}

fn handle(app: &App, mut request: Request) {
    let reply = match read_body(&mut request, app.max_body_bytes) {
        Ok(body) => router::dispatch(app, request.method(), request.url(), &body),
        Err(reply) => reply,
    };

    if app.log_requests {
        let line = format!("{} {} -> {}", request.method(), request.url(), reply.status);
        match reply.is_success() {
            true => color_print::cprintln!("<g>[serve]</> {}", line),
            false => color_print::cprintln!("<y>[serve]</> {}", line),
        }
    }

    if let Err(err) = request.respond(reply.into_response()) {
        color_print::ceprintln!("<r>[serve] Error: failed to respond: {}</>", err);
    }
}

/// Read at most `limit` bytes of body. Anything larger is refused with 413.
fn read_body(request: &mut Request, limit: usize) -> Result<Vec<u8>, Reply> {
    let too_large = || Reply::failure(413, "Request body too large");

    if request.body_length().is_some_and(|length| length > limit) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|_| Reply::failure(400, "Failed to read request body"))?;

    match body.len() > limit {
        true => Err(too_large()),
        false => Ok(body),
    }
}
