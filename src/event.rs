//! Event handling.
//!
//! This library exposes an event-based interface for reacting
//! to the state changes of the emulator in real-time. [EventListeners](EventListener)
//! can be registered on the [Emulator](crate::emulator::Emulator) with the
//! [add_listener](crate::emulator::Emulator::add_listener) method.
//!
//! A blanket implementation of [EventListener] for all `Fn(&Event)` is provided.

/// Represents an event that occurred while executing a program.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<W> {
    /// The program modified a register.
    RegisterChange {
        /// The index of the modified register.
        register: usize,

        /// The new value of the register.
        value: W,
    },

    /// The program counter was moved by an increment or decrement instruction.
    Jump {
        from: usize,
        target: usize,
    },

    /// The execution halted.
    Halt {
        /// The line of the instruction that halted the execution.
        line: usize,

        /// True if the execution halted by jumping past the end of the program instead of
        /// executing a `HALT` instruction.
        implicit: bool,
    },
}

/// Trait for consuming events.
pub trait EventListener<W> {
    /// Called whenever a new event has been created.
    fn event(&mut self, event: &Event<W>);
}

impl<W, F> EventListener<W> for F where F: FnMut(&Event<W>) {
    fn event(&mut self, event: &Event<W>) {
        self(event)
    }
}

pub(crate) struct EventDispatcher<W> {
    listeners: Vec<Box<dyn EventListener<W>>>,
}

impl<W> EventDispatcher<W> {
    pub fn new() -> EventDispatcher<W> {
        EventDispatcher {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener<L: EventListener<W> + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener) as Box<dyn EventListener<W>>)
    }

    pub fn dispatch(&mut self, event: Event<W>) {
        for listener in &mut self.listeners {
            listener.event(&event);
        }
    }
}
