// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Drives the data-in and data-out adapters through a real [`Dispatcher`],
//! covering the JSON-framing and data-available round-trip scenarios.

use frt_core::{CoreError, EventMask, Message, MessageHeap, MessagePayload, Node, NodeContext, NodeIdentity, NodeState, StatusCode, Stream};
use frt_dispatcher::{Dispatcher, NodeFactory};
use frt_io::{DataInAdapter, DataInMode, DataOutAdapter, ReadCallback};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

struct FixedInStream {
    inbound: VecDeque<u8>,
}

impl Stream for FixedInStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CoreError> {
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn available(&self) -> usize {
        self.inbound.len()
    }

    fn clear(&mut self) {
        self.inbound.clear();
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize, CoreError> {
        Ok(0)
    }
}

struct LoggingOutStream {
    outbound: Arc<Mutex<Vec<u8>>>,
}

impl Stream for LoggingOutStream {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, CoreError> {
        Ok(0)
    }

    fn available(&self) -> usize {
        0
    }

    fn clear(&mut self) {}

    fn write(&mut self, buf: &[u8]) -> Result<usize, CoreError> {
        self.outbound.lock().extend_from_slice(buf);
        Ok(buf.len())
    }
}

struct JsonSourceNode {
    adapter: Mutex<DataInAdapter<FixedInStream>>,
    dispatcher: Arc<OnceLock<Dispatcher>>,
}

impl Node for JsonSourceNode {
    fn init(&mut self, _ctx: &NodeContext<'_>) -> StatusCode {
        StatusCode::Ok
    }

    fn recv_evt(&mut self, ctx: &NodeContext<'_>, _mask: EventMask) -> StatusCode {
        let dispatcher = self.dispatcher.get().expect("dispatcher handle set before dispatch begins");
        let (message, follow_up) = match self.adapter.lock().on_data_available() {
            Ok(result) => result,
            Err(_) => return StatusCode::Error,
        };
        if let Some(msg) = message {
            let _ = dispatcher.send_msg_from(ctx.identity.cfg_id.as_str(), msg, 0);
        }
        if !follow_up.is_empty() {
            let _ = dispatcher.send_evt(ctx.identity.cfg_id.as_str(), follow_up, 0);
        }
        StatusCode::Ok
    }
}

struct SinkNode {
    received: Arc<Mutex<Vec<String>>>,
}

impl Node for SinkNode {
    fn init(&mut self, _ctx: &NodeContext<'_>) -> StatusCode {
        StatusCode::Ok
    }

    fn recv_msg(&mut self, _ctx: &NodeContext<'_>, msg: Message) -> StatusCode {
        if let MessagePayload::Str(s) = msg.payload() {
            self.received.lock().push(s.clone());
        }
        let _ = msg.free();
        StatusCode::Ok
    }
}

#[test]
fn json_framing_scenario_emits_exactly_one_object_to_the_wired_sink() {
    let dispatcher_cell: Arc<OnceLock<Dispatcher>> = Arc::new(OnceLock::new());
    let received = Arc::new(Mutex::new(Vec::new()));

    let mut factory = NodeFactory::new();
    {
        let dispatcher_cell = dispatcher_cell.clone();
        factory
            .register("json_source", move |_identity| {
                Box::new(JsonSourceNode {
                    adapter: Mutex::new(DataInAdapter::new(
                        FixedInStream { inbound: VecDeque::from(b"garbage{\"a\":{\"b\":1}}tail".to_vec()) },
                        DataInMode::Json,
                        256,
                    )),
                    dispatcher: dispatcher_cell.clone(),
                }) as Box<dyn Node>
            })
            .unwrap();
    }
    {
        let received = received.clone();
        factory
            .register("sink", move |_identity| Box::new(SinkNode { received: received.clone() }) as Box<dyn Node>)
            .unwrap();
    }

    let dispatcher = Dispatcher::new(factory);
    dispatcher_cell.set(dispatcher.clone()).ok();

    let sink_id = NodeIdentity::new("sink", "sink", "sink", Vec::new()).unwrap();
    dispatcher.node_alloc(sink_id).unwrap();
    let source_id = NodeIdentity::new("source", "source", "json_source", vec!["sink".into()]).unwrap();
    dispatcher.node_alloc(source_id).unwrap();
    assert_eq!(dispatcher.node_state("source").unwrap(), NodeState::Initialised);

    dispatcher.send_evt("source", EventMask::DATA_AVAIL, 0).unwrap();
    // One dispatch delivers the event to json_source (which forwards the
    // framed object onward); a second delivers that forwarded message to
    // the sink.
    assert!(dispatcher.dispatch_one(None));
    assert!(dispatcher.dispatch_one(None));

    assert_eq!(*received.lock(), vec!["{\"a\":{\"b\":1}}".to_string()]);
}

struct WriterNode {
    adapter: Mutex<DataOutAdapter<LoggingOutStream>>,
}

impl Node for WriterNode {
    fn init(&mut self, _ctx: &NodeContext<'_>) -> StatusCode {
        StatusCode::Ok
    }

    fn recv_msg(&mut self, _ctx: &NodeContext<'_>, msg: Message) -> StatusCode {
        match self.adapter.lock().on_message(msg) {
            Ok(()) => StatusCode::Ok,
            Err(_) => StatusCode::Error,
        }
    }

    fn recv_evt(&mut self, _ctx: &NodeContext<'_>, mask: EventMask) -> StatusCode {
        if !mask.contains(EventMask::WRITE_COMPLETE) {
            return StatusCode::Ok;
        }
        match self.adapter.lock().on_write_complete() {
            Ok(()) => StatusCode::Ok,
            Err(_) => StatusCode::Error,
        }
    }
}

#[test]
fn data_available_round_trip_drains_a_seven_byte_source_through_a_four_byte_buffer() {
    let outbound = Arc::new(Mutex::new(Vec::new()));

    let mut factory = NodeFactory::new();
    {
        let outbound = outbound.clone();
        factory
            .register("writer", move |_identity| {
                let mut remaining: VecDeque<u8> = VecDeque::from(b"1234567".to_vec());
                let read_cb = ReadCallback::new(move |buf| {
                    let mut n = 0;
                    while n < buf.len() {
                        match remaining.pop_front() {
                            Some(b) => {
                                buf[n] = b;
                                n += 1;
                            }
                            None => break,
                        }
                    }
                    Ok(n)
                });
                Box::new(WriterNode {
                    adapter: Mutex::new(DataOutAdapter::new(LoggingOutStream { outbound: outbound.clone() }, read_cb, 4)),
                }) as Box<dyn Node>
            })
            .unwrap();
    }

    let dispatcher = Dispatcher::new(factory);
    let writer_id = NodeIdentity::new("writer", "writer", "writer", Vec::new()).unwrap();
    dispatcher.node_alloc(writer_id).unwrap();

    let trigger = MessageHeap.alloc("out", MessagePayload::DataAvailable { available: 7 });
    dispatcher.send_msg_to("writer", trigger, 0).unwrap();
    assert!(dispatcher.dispatch_one(None));

    dispatcher.send_evt("writer", EventMask::WRITE_COMPLETE, 0).unwrap();
    assert!(dispatcher.dispatch_one(None));
    dispatcher.send_evt("writer", EventMask::WRITE_COMPLETE, 0).unwrap();
    assert!(dispatcher.dispatch_one(None));

    assert_eq!(*outbound.lock(), b"1234567".to_vec());
}
