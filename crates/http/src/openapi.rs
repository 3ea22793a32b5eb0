//! OpenAPI document assembled from the registered modules.

use posters_kernel::ModuleRegistry;
use serde_json::{json, Value};

/// Base document plus every module's paths (prefixed with `/api/{module}`)
/// and schemas. Module paths are marked as requiring a bearer token.
pub fn merged_spec(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Posters API",
            "version": "1.0.0",
            "description": "Movie poster catalogue"
        },
        "paths": {},
        "components": {
            "schemas": {},
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": { "type": "array", "items": {} },
                    "trace_id": { "type": "string" },
                    "timestamp": { "type": "string" }
                },
                "required": ["code", "message", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                let prefixed_path = if path == "/" {
                    format!("/api/{}", module.name())
                } else {
                    format!("/api/{}{}", module.name(), path)
                };

                let mut path_item = path_item.clone();
                if let Some(operations) = path_item.as_object_mut() {
                    for operation in operations.values_mut().filter_map(Value::as_object_mut) {
                        operation.insert("security".to_string(), json!([{ "bearerAuth": [] }]));
                    }
                }
                openapi_spec["paths"][prefixed_path] = path_item;
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use posters_kernel::Module;

    struct DocumentedModule;

    #[async_trait::async_trait]
    impl Module for DocumentedModule {
        fn name(&self) -> &'static str {
            "things"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": {
                    "/": { "get": { "summary": "List things" } },
                    "/{id}": { "get": { "summary": "Get thing" } }
                },
                "components": { "schemas": { "Thing": { "type": "object" } } }
            }))
        }
    }

    #[test]
    fn module_paths_are_prefixed_and_secured() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(DocumentedModule));

        let spec = merged_spec(&registry);

        assert_eq!(spec["paths"]["/api/things"]["get"]["summary"], "List things");
        assert_eq!(
            spec["paths"]["/api/things/{id}"]["get"]["security"],
            json!([{ "bearerAuth": [] }])
        );
        assert!(spec["paths"]["/healthz"]["get"]["security"].is_null());
        assert_eq!(spec["components"]["schemas"]["Thing"]["type"], "object");
        assert!(spec["components"]["schemas"]["ErrorResponse"].is_object());
    }
}
