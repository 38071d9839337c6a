//! BoxMessageStore -- object-safe dynamic dispatch wrapper for MessageStore.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`:
//! 1. Define an object-safe `MessageStoreDyn` trait with boxed futures
//! 2. Blanket-impl `MessageStoreDyn` for all `T: MessageStore`
//! 3. `BoxMessageStore` wraps `Box<dyn MessageStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::error::RepositoryError;
use parley_types::message::Message;

use super::message::MessageStore;

/// Object-safe version of [`MessageStore`] with boxed futures.
pub trait MessageStoreDyn: Send + Sync {
    fn backend_name(&self) -> &str;

    fn append_boxed<'a>(
        &'a self,
        message: &'a Message,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;

    fn load_all_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, RepositoryError>> + Send + '_>>;
}

impl<T: MessageStore> MessageStoreDyn for T {
    fn backend_name(&self) -> &str {
        MessageStore::backend(self)
    }

    fn append_boxed<'a>(
        &'a self,
        message: &'a Message,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.append(message))
    }

    fn load_all_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, RepositoryError>> + Send + '_>> {
        Box::pin(self.load_all())
    }
}

/// Type-erased message store for runtime backend selection.
///
/// The server decides between the JSON file and SQLite backends from its
/// configuration; everything downstream sees a single `BoxMessageStore`.
pub struct BoxMessageStore {
    inner: Box<dyn MessageStoreDyn + Send + Sync>,
}

impl BoxMessageStore {
    /// Wrap a concrete `MessageStore` in a type-erased box.
    pub fn new<T: MessageStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl MessageStore for BoxMessageStore {
    fn backend(&self) -> &str {
        self.inner.backend_name()
    }

    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.inner.append_boxed(message).await
    }

    async fn load_all(&self) -> Result<Vec<Message>, RepositoryError> {
        self.inner.load_all_boxed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct VecStore {
        messages: Mutex<Vec<Message>>,
    }

    impl MessageStore for VecStore {
        fn backend(&self) -> &str {
            "vec"
        }

        async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn load_all(&self) -> Result<Vec<Message>, RepositoryError> {
            Ok(self.messages.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_box_store_delegates() {
        let store = BoxMessageStore::new(VecStore {
            messages: Mutex::new(Vec::new()),
        });
        assert_eq!(store.backend(), "vec");
        assert_eq!(store.inner.backend_name(), "vec");

        let msg = Message::user("boxed");
        store.append(&msg).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all, vec![msg]);
    }
}
