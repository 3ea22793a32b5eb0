pub mod models;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use posters_db::PosterStore;
use posters_kernel::{InitCtx, Module};
use serde_json::json;

/// Posters module: CRUD over the poster collection
pub struct PostersModule {
    store: Arc<dyn PosterStore>,
}

impl PostersModule {
    pub fn new(store: Arc<dyn PosterStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for PostersModule {
    fn name(&self) -> &'static str {
        "posters"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = ctx
            .store
            .count()
            .await
            .context("failed to count posters")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ctx.store.backend(),
            collection = %ctx.settings.database.collection,
            count,
            "posters module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let poster = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Poster" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" },
            "description": "Catalogue key of the poster"
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List posters",
                        "tags": ["Posters"],
                        "responses": {
                            "200": {
                                "description": "All posters",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Poster" }
                                        }
                                    }
                                }
                            },
                            "401": error("Missing or invalid token")
                        }
                    },
                    "post": {
                        "summary": "Create a poster",
                        "tags": ["Posters"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Poster" }
                                }
                            }
                        },
                        "responses": {
                            "201": poster("Created poster"),
                            "400": error("Malformed JSON body"),
                            "401": error("Missing or invalid token"),
                            "409": error("A poster with this id already exists"),
                            "422": error("id, url or title missing")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a poster",
                        "tags": ["Posters"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": poster("The poster"),
                            "401": error("Missing or invalid token"),
                            "404": error("Poster not found")
                        }
                    },
                    "put": {
                        "summary": "Update a poster's url and/or title",
                        "tags": ["Posters"],
                        "parameters": id_param.clone(),
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdatePoster" }
                                }
                            }
                        },
                        "responses": {
                            "200": poster("Updated poster"),
                            "400": error("Malformed JSON body"),
                            "401": error("Missing or invalid token"),
                            "404": error("Poster not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a poster",
                        "tags": ["Posters"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Poster deleted" },
                            "401": error("Missing or invalid token"),
                            "404": error("Poster not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Poster": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Catalogue key, e.g. tt0111161"
                            },
                            "url": {
                                "type": "string",
                                "description": "Link to the poster image"
                            },
                            "title": {
                                "type": "string",
                                "description": "Display title of the movie"
                            }
                        },
                        "required": ["id", "url", "title"]
                    },
                    "UpdatePoster": {
                        "type": "object",
                        "properties": {
                            "url": { "type": "string" },
                            "title": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "posters module stopped");
        Ok(())
    }
}

/// Create a new instance of the posters module
pub fn create_module(store: Arc<dyn PosterStore>) -> Arc<dyn Module> {
    Arc::new(PostersModule::new(store))
}
