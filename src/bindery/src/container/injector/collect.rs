use std::sync::Arc;

use crate::container::injector::{InjectorError, TypedInjector};
use crate::container::Managed;

pub(super) fn collect_tagged<T, I>(injector: &I, tag: &str) -> Result<Vec<Arc<T>>, InjectorError>
where
    T: Managed,
    I: TypedInjector + ?Sized,
{
    let mut names = injector.names();
    names.sort();

    let mut collection = Vec::new();
    for name in &names {
        let tags = injector.provider_tags(name)?;
        if tags.iter().any(|t| t == tag) {
            collection.push(injector.get::<T>(name)?);
        }
    }

    if !collection.is_empty() {
        Ok(collection)
    } else {
        Err(InjectorError::EmptyCollection {
            tag: tag.to_owned(),
        })
    }
}
