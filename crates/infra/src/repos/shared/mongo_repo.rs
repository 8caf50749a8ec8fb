use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, to_bson, Document},
    Collection, Cursor,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

fn get_id_filter(oid: &ObjectId) -> Document {
    doc! {
        "_id": oid
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Document {
    let raw = D::from_domain(entity);
    doc_to_persistence(&raw)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> E {
    let raw: D = bson::from_document(doc).unwrap();
    raw.to_domain()
}

fn doc_to_persistence<E, D: MongoDocument<E>>(raw: &D) -> Document {
    to_bson(raw).unwrap().as_document().unwrap().to_owned()
}

pub async fn insert<E, D: MongoDocument<E>>(collection: &Collection, entity: &E) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity);
    let _res = collection.insert_one(doc, None).await;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(collection: &Collection, entity: &E) -> Result<()> {
    let raw = D::from_domain(entity);
    let filter = raw.get_id_filter();
    let doc = doc_to_persistence(&raw);
    let _res = collection.update_one(filter, doc, None).await;
    Ok(())
}

/// Applies `update` to the single document matching `filter` and
/// reports whether a document was matched and modified. Used for
/// conditional (compare-and-swap style) updates.
pub async fn update_one(collection: &Collection, filter: Document, update: Document) -> Result<bool> {
    let res = collection.update_one(filter, update, None).await?;
    Ok(res.modified_count > 0)
}

pub async fn find<E, D: MongoDocument<E>>(collection: &Collection, id: &ObjectId) -> Option<E> {
    let filter = get_id_filter(id);
    find_one_by::<E, D>(collection, filter).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
) -> Option<E> {
    let res = collection.find_one(filter, None).await;
    match res {
        Ok(doc) if doc.is_some() => {
            let doc = doc.unwrap();
            let e = persistence_to_entity::<E, D>(doc);
            Some(e)
        }
        _ => None,
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
) -> Result<Vec<E>> {
    let res = collection.find(filter, None).await;

    match res {
        Ok(cursor) => Ok(consume_cursor::<E, D>(cursor).await),
        Err(err) => Err(anyhow::Error::new(err)),
    }
}

pub async fn delete_one_by<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
) -> Option<E> {
    let res = collection.find_one_and_delete(filter, None).await;
    match res {
        Ok(doc) if doc.is_some() => {
            let e = persistence_to_entity::<E, D>(doc.unwrap());
            Some(e)
        }
        _ => None,
    }
}

async fn consume_cursor<E, D: MongoDocument<E>>(mut cursor: Cursor) -> Vec<E> {
    let mut documents = vec![];
    while let Some(result) = cursor.next().await {
        match result {
            Ok(document) => {
                documents.push(persistence_to_entity::<E, D>(document));
            }
            Err(e) => {
                error!("Error consuming cursor: {:?}", e);
            }
        }
    }

    documents
}
