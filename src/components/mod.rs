pub mod document_relations;
