pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use sqlx::SqlitePool;

use bookshelf_auth::TokenVerifier;
use bookshelf_kernel::{InitCtx, Migration, Module};

use store::FavoriteStore;

/// Favorites module: per-user favorites, gated by the token extractor.
pub struct FavoritesModule {
    store: FavoriteStore,
    verifier: TokenVerifier,
}

impl FavoritesModule {
    pub fn new(pool: SqlitePool, verifier: TokenVerifier) -> Self {
        Self {
            store: FavoriteStore::new(pool),
            verifier,
        }
    }
}

#[async_trait]
impl Module for FavoritesModule {
    fn name(&self) -> &'static str {
        "favorites"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "favorites module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone(), self.verifier.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List the authenticated user's favorites",
                        "tags": ["Favorites"],
                        "responses": {
                            "200": {
                                "description": "Favorites joined with their books, by title",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/FavoriteBook"
                                            }
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing or invalid token",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book to favorites",
                        "tags": ["Favorites"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookIdBody"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The created favorite",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Favorite"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Book ID must be an integer",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing or invalid token",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "409": {
                                "description": "Already a favorite",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Remove a book from favorites",
                        "tags": ["Favorites"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookIdBody"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The removed favorite",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Favorite"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Book ID must be an integer",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing or invalid token",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Favorite not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/check": {
                    "get": {
                        "summary": "Check whether a book is a favorite",
                        "tags": ["Favorites"],
                        "parameters": [
                            {
                                "name": "bookId",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Whether the pair exists",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "boolean" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Book ID must be an integer",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing or invalid token",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Favorite": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "userId": { "type": "integer" },
                            "bookId": { "type": "integer" }
                        },
                        "required": ["id", "userId", "bookId"]
                    },
                    "FavoriteBook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "userId": { "type": "integer" },
                            "bookId": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "description": { "type": "string" },
                            "coverUrl": { "type": "string", "format": "uri" }
                        },
                        "required": ["id", "userId", "bookId", "title", "author",
                                     "genre", "description", "coverUrl"]
                    },
                    "BookIdBody": {
                        "type": "object",
                        "properties": {
                            "bookId": {
                                "oneOf": [
                                    { "type": "integer" },
                                    { "type": "string", "pattern": "^-?[0-9]+$" }
                                ]
                            }
                        },
                        "required": ["bookId"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_favorites",
            up: r#"
                CREATE TABLE favorites (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id),
                    book_id INTEGER NOT NULL REFERENCES books(id),
                    UNIQUE (user_id, book_id)
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "favorites module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "favorites module stopped");
        Ok(())
    }
}

/// Create a new instance of the favorites module
pub fn create_module(pool: SqlitePool, verifier: TokenVerifier) -> Arc<dyn Module> {
    Arc::new(FavoritesModule::new(pool, verifier))
}
