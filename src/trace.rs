use std::sync::Arc;

/// Caller-injected observability hook invoked around each client operation.
///
/// The client calls [`on_start`](OperationTracer::on_start) before issuing
/// an operation and [`on_end`](OperationTracer::on_end) after it completes,
/// with the operation name and whether it succeeded. The hook is an
/// explicit capability passed to the client, not implicit wrapping; when
/// none is injected, the client emits only its own `tracing` events and no
/// subscriber is installed by this library.
pub trait OperationTracer: Send + Sync {
    fn on_start(&self, operation: &str);
    fn on_end(&self, operation: &str, success: bool);
}

pub(crate) type SharedTracer = Arc<dyn OperationTracer>;

/// Scope guard that reports the end event even on early return.
pub(crate) struct TraceScope<'a> {
    tracer: Option<&'a SharedTracer>,
    operation: &'static str,
    success: bool,
}

impl<'a> TraceScope<'a> {
    pub(crate) fn enter(tracer: Option<&'a SharedTracer>, operation: &'static str) -> Self {
        if let Some(tracer) = tracer {
            tracer.on_start(operation);
        }
        Self {
            tracer,
            operation,
            success: false,
        }
    }

    pub(crate) fn succeed(&mut self) {
        self.success = true;
    }
}

impl Drop for TraceScope<'_> {
    fn drop(&mut self) {
        if let Some(tracer) = self.tracer {
            tracer.on_end(self.operation, self.success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTracer {
        events: Mutex<Vec<String>>,
    }

    impl OperationTracer for RecordingTracer {
        fn on_start(&self, operation: &str) {
            self.events.lock().unwrap().push(format!("start:{operation}"));
        }
        fn on_end(&self, operation: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("end:{operation}:{success}"));
        }
    }

    #[test]
    fn test_scope_start_and_end_events() {
        let recorder = Arc::new(RecordingTracer::default());
        let tracer: SharedTracer = recorder.clone();
        {
            let mut scope = TraceScope::enter(Some(&tracer), "submit");
            scope.succeed();
        }
        {
            let _scope = TraceScope::enter(Some(&tracer), "status");
            // dropped without succeed(): reported as failure
        }
        let events = recorder.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start:submit".to_string(),
                "end:submit:true".to_string(),
                "start:status".to_string(),
                "end:status:false".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_tracer_is_a_noop() {
        let mut scope = TraceScope::enter(None, "submit");
        scope.succeed();
    }
}
