//! The collaborator that actually shows a frame to its recipients.

/// Shows frame payloads to a set of recipients.
///
/// Implement this for whatever the host offers (chat messages, action bars,
/// a terminal, ...). Calls are synchronous; an `Err` is handed back to the
/// caller of [`Scheduler::on_tick`](crate::Scheduler::on_tick) and the
/// scheduler does not advance.
///
/// Any `FnMut(&P, &[R]) -> Result<(), E>` closure is a `Display`.
pub trait Display<P, R> {
    type Error;

    /// Show `payload` to every recipient.
    fn display(&mut self, payload: &P, recipients: &[R]) -> Result<(), Self::Error>;
}

impl<P, R, E, F> Display<P, R> for F
where
    F: FnMut(&P, &[R]) -> Result<(), E>,
{
    type Error = E;

    fn display(&mut self, payload: &P, recipients: &[R]) -> Result<(), E> {
        self(payload, recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inbox(Vec<(String, usize)>);

    impl Display<String, u32> for Inbox {
        type Error = std::convert::Infallible;

        fn display(&mut self, payload: &String, recipients: &[u32]) -> Result<(), Self::Error> {
            self.0.push((payload.clone(), recipients.len()));
            Ok(())
        }
    }

    #[test]
    fn closure_is_display() {
        let mut shown = Vec::new();
        let mut display = |payload: &String, recipients: &[u32]| -> Result<(), ()> {
            shown.push(format!("{} -> {:?}", payload, recipients));
            Ok(())
        };
        Display::<String, u32>::display(&mut display, &"hi".to_string(), &[7, 9]).unwrap();
        assert_eq!(shown, vec!["hi -> [7, 9]"]);
    }

    #[test]
    fn struct_is_display() {
        let mut inbox = Inbox(Vec::new());
        inbox.display(&"frame".to_string(), &[1, 2, 3]).unwrap();
        assert_eq!(inbox.0, vec![("frame".to_string(), 3)]);
    }
}
