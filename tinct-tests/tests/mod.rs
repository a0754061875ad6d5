mod factory;
mod functions;
