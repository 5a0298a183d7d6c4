//! Console facade
//!
//! Assembles one session: a [`Store`], the [`CommandInterpreter`] writing to
//! it and the [`EventGenerator`] following its running flag. Construction and
//! teardown are explicit; nothing here is global.

use tracing::info;

use crypton_core::{ConsoleConfig, ConsoleResult, Store};

use crate::generator::EventGenerator;
use crate::interpreter::CommandInterpreter;
use crate::scheduler::Scheduler;

pub struct Console {
    store: Store,
    interpreter: CommandInterpreter,
    generator: EventGenerator,
}

impl Console {
    /// Build and wire a session on the current tokio runtime
    pub fn new(config: ConsoleConfig) -> ConsoleResult<Self> {
        config.validate()?;

        let store = Store::new(&config.store);
        let interpreter = CommandInterpreter::new(store.clone(), config.interpreter)?;
        let generator = EventGenerator::new(store.clone(), config.generator)?;
        generator.attach();

        info!("Console session started");
        Ok(Self {
            store,
            interpreter,
            generator,
        })
    }

    /// Interpret one line of terminal input
    pub fn interpret(&self, raw: &str) {
        self.interpreter.interpret(raw);
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.interpreter.scheduler()
    }

    pub fn generator(&self) -> &EventGenerator {
        &self.generator
    }

    /// Resolve once every staged sequence issued so far has completed
    pub async fn settle(&self) {
        self.scheduler().wait_idle().await;
    }

    /// Detach the generator and abort pending staged output
    pub fn shutdown(&self) {
        self.generator.detach();
        let cancelled = self.scheduler().cancel_all();
        info!(cancelled, "Console session shut down");
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("store", &self.store)
            .field("scheduler", self.scheduler())
            .field("generator_active", &self.generator.is_active())
            .finish()
    }
}
