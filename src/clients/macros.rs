/// Lookup and shutdown methods every entity client shares.
///
/// `get_<entity>` treats a missing id as the entity error's not-found case, via
/// `From<FrameworkError>`.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: &str) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id.to_string()).await?.ok_or_else(|| {
                        <$error>::from($crate::actor_framework::FrameworkError::NotFound(id.to_string()))
                    })
                }

                #[tracing::instrument(skip(self))]
                pub async fn shutdown(&self) -> Result<(), $crate::actor_framework::FrameworkError> {
                    tracing::debug!("Sending request");
                    self.inner.shutdown().await
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}
