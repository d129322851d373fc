mod response;
